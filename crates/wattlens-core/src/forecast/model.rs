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

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wattlens_types::Granularity;

use super::{PatternModel, PatternPoint};
use crate::error::{ModelError, ModelResult};

/// Linear trend in model units per period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub intercept: f64,
    pub slope: f64,
}

/// Pre-fitted additive model: linear trend plus optional weekly seasonality
///
/// Fitted offline and shipped as JSON. The period index `t` counts steps from
/// the first history point; `weekly_seasonality` is indexed Monday = 0 and is
/// either empty (no weekly term) or exactly seven values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeasonalModel {
    pub granularity: Granularity,

    /// In-sample series the model was fitted on (oldest first)
    pub history: Vec<PatternPoint>,

    pub trend: LinearTrend,

    #[serde(default)]
    pub weekly_seasonality: Vec<f64>,
}

impl TrendSeasonalModel {
    /// Parse and validate a model file
    pub fn from_file(path: &Path) -> ModelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> ModelResult<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Constant daily model: flat history at `level`, predicting `level` forever
    #[cfg(test)]
    pub(crate) fn flat(start: NaiveDateTime, level: f64, len: usize) -> Self {
        let history = (0..len)
            .scan(start, |at, _| {
                let point = PatternPoint {
                    at: *at,
                    value: level,
                };
                *at += Duration::days(1);
                Some(point)
            })
            .collect();

        Self {
            granularity: Granularity::Daily,
            history,
            trend: LinearTrend {
                intercept: level,
                slope: 0.0,
            },
            weekly_seasonality: Vec::new(),
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if !self.weekly_seasonality.is_empty() && self.weekly_seasonality.len() != 7 {
            return Err(ModelError::Invalid(format!(
                "weekly_seasonality must have 0 or 7 values, got {}",
                self.weekly_seasonality.len()
            )));
        }
        if !self.trend.intercept.is_finite() || !self.trend.slope.is_finite() {
            return Err(ModelError::Invalid("trend coefficients must be finite".to_owned()));
        }
        if self.weekly_seasonality.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Invalid(
                "weekly_seasonality values must be finite".to_owned(),
            ));
        }
        if let Some(idx) = self.history.iter().position(|p| !p.value.is_finite()) {
            return Err(ModelError::Invalid(format!(
                "history value at index {idx} is not finite"
            )));
        }
        if let Some(idx) = self.history.windows(2).position(|w| w[0].at > w[1].at) {
            return Err(ModelError::Invalid(format!(
                "history is not in time order at index {}",
                idx + 1
            )));
        }
        Ok(())
    }

    /// Model value at period index `t` falling on `at`
    pub fn value_at(&self, t: i64, at: NaiveDateTime) -> f64 {
        let weekday = at.weekday().num_days_from_monday() as usize;
        let seasonal = self
            .weekly_seasonality
            .get(weekday)
            .copied()
            .unwrap_or(0.0);

        #[expect(
            clippy::cast_precision_loss,
            reason = "period indices stay far below mantissa precision"
        )]
        let t = t as f64;
        self.trend.intercept + self.trend.slope * t + seasonal
    }
}

impl PatternModel for TrendSeasonalModel {
    fn history(&self) -> &[PatternPoint] {
        &self.history
    }

    fn predict(&self, periods: usize, period_length: Duration) -> Vec<PatternPoint> {
        let mut points = Vec::with_capacity(self.history.len() + periods);

        let mut t: i64 = 0;
        for point in &self.history {
            points.push(PatternPoint {
                at: point.at,
                value: self.value_at(t, point.at),
            });
            t += 1;
        }

        let mut at = self
            .history
            .last()
            .map_or_else(NaiveDateTime::default, |p| p.at);
        for _ in 0..periods {
            at += period_length;
            points.push(PatternPoint {
                at,
                value: self.value_at(t, at),
            });
            t += 1;
        }

        points
    }
}
