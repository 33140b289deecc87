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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of most recent days shown on the daily chart and used for stats
pub const DEFAULT_TRAILING_WINDOW_DAYS: usize = 30;

/// Number of days forecast past the last day of history
pub const DEFAULT_FORECAST_HORIZON_DAYS: usize = 7;

/// Number of most recent raw readings shown on the hourly chart
pub const DEFAULT_HOURLY_WINDOW: usize = 72;

/// Number of entries in the peak days list
pub const DEFAULT_PEAK_DAY_COUNT: usize = 3;

/// Flat placeholder rate used for the bill estimate (currency per kWh)
pub const DEFAULT_BILL_RATE_PER_KWH: f64 = 0.50;

/// Aggregation granularity of a chart or pattern model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Monthly,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    pub fn all() -> &'static [Granularity] {
        &[Self::Hourly, Self::Daily, Self::Monthly]
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(anyhow::anyhow!(
                "Unknown granularity: '{}'. Supported: {}",
                s,
                Self::all()
                    .iter()
                    .map(|g| g.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Windowing and billing policy of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPolicy {
    /// Days of history used for the daily chart, stats and peak days
    #[serde(default = "default_trailing_window_days")]
    pub trailing_window_days: usize,

    /// Daily forecast horizon (days)
    #[serde(default = "default_forecast_horizon_days")]
    pub forecast_horizon_days: usize,

    /// Raw readings shown on the hourly chart
    #[serde(default = "default_hourly_window")]
    pub hourly_window: usize,

    /// Entries in the peak days list
    #[serde(default = "default_peak_day_count")]
    pub peak_day_count: usize,

    /// Rate applied to total consumption for the bill estimate
    #[serde(default = "default_bill_rate_per_kwh")]
    pub bill_rate_per_kwh: f64,
}

fn default_trailing_window_days() -> usize {
    DEFAULT_TRAILING_WINDOW_DAYS
}

fn default_forecast_horizon_days() -> usize {
    DEFAULT_FORECAST_HORIZON_DAYS
}

fn default_hourly_window() -> usize {
    DEFAULT_HOURLY_WINDOW
}

fn default_peak_day_count() -> usize {
    DEFAULT_PEAK_DAY_COUNT
}

fn default_bill_rate_per_kwh() -> f64 {
    DEFAULT_BILL_RATE_PER_KWH
}

impl Default for DashboardPolicy {
    fn default() -> Self {
        Self {
            trailing_window_days: DEFAULT_TRAILING_WINDOW_DAYS,
            forecast_horizon_days: DEFAULT_FORECAST_HORIZON_DAYS,
            hourly_window: DEFAULT_HOURLY_WINDOW,
            peak_day_count: DEFAULT_PEAK_DAY_COUNT,
            bill_rate_per_kwh: DEFAULT_BILL_RATE_PER_KWH,
        }
    }
}

impl DashboardPolicy {
    /// Bill estimate for a consumption total
    pub fn estimate_bill(&self, total_kwh: f64) -> f64 {
        total_kwh * self.bill_rate_per_kwh
    }
}
