// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of WattLens.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};

use crate::display;

/// Label shown for the peak day when there is no history
pub const NO_DATA_LABEL: &str = "-";

/// Chart-ready series: labels with aligned history and forecast values
///
/// History occupies the leading indices and forecast the trailing ones; at
/// every index at least one of the two is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,

    #[serde(serialize_with = "display::energy_series")]
    pub history: Vec<Option<f64>>,

    #[serde(serialize_with = "display::energy_series")]
    pub forecast: Vec<Option<f64>>,
}

impl ChartSeries {
    /// History-only series (forecast kept as all-null for a uniform shape)
    pub fn history_only(labels: Vec<String>, values: impl IntoIterator<Item = f64>) -> Self {
        let history: Vec<Option<f64>> = values.into_iter().map(Some).collect();
        let forecast = vec![None; history.len()];
        Self {
            labels,
            history,
            forecast,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of all non-null history values
    pub fn history_total(&self) -> f64 {
        self.history.iter().flatten().sum()
    }
}

/// Summary statistics over the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(serialize_with = "display::energy")]
    pub total_past: f64,

    #[serde(serialize_with = "display::energy")]
    pub avg_past: f64,

    pub max_day_label: String,

    pub max_day_value: f64,

    #[serde(serialize_with = "display::currency")]
    pub estimated_bill: f64,
}

impl Default for StatsSummary {
    fn default() -> Self {
        Self {
            total_past: 0.0,
            avg_past: 0.0,
            max_day_label: NO_DATA_LABEL.to_owned(),
            max_day_value: 0.0,
            estimated_bill: 0.0,
        }
    }
}

/// One of the highest-consumption days in the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDay {
    pub label: String,
    pub value: f64,
}

/// Everything the dashboard needs for one account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub hourly_chart: ChartSeries,
    pub daily_chart: ChartSeries,
    pub monthly_chart: ChartSeries,
    pub stats: StatsSummary,
    pub peak_days: Vec<PeakDay>,
}

impl DashboardReport {
    /// Report for an account without any readings
    pub fn empty() -> Self {
        Self::default()
    }
}
