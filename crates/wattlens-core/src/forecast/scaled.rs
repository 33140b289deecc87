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

use chrono::{Duration, NaiveDate, NaiveTime};
use std::sync::Arc;
use wattlens_types::ForecastPoint;

use super::PatternModel;
use crate::calendar::{mean, trailing_window};

/// Forecast whose shape comes from a shared pattern model and whose magnitude
/// follows one account's own average
///
/// The model's calendar is discarded: forecast dates always continue the
/// account's last known date.
#[derive(Debug, Clone)]
pub struct ScaledForecaster {
    model: Arc<dyn PatternModel>,
}

impl ScaledForecaster {
    pub fn new(model: Arc<dyn PatternModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<dyn PatternModel> {
        &self.model
    }

    /// Mean of the model's fitted history, 1.0 when empty or exactly zero
    pub fn global_mean(&self) -> f64 {
        match mean(self.model.history().iter().map(|p| p.value)) {
            Some(m) if m != 0.0 => m,
            _ => 1.0,
        }
    }

    /// Ratio of the account's mean to the model's mean (1.0 without an anchor)
    pub fn scale_for(&self, anchor_mean: Option<f64>) -> f64 {
        anchor_mean.map_or(1.0, |anchor| anchor / self.global_mean())
    }

    /// Scaled forecast for `period_count` periods after `last_known_date`
    ///
    /// Values are not clamped: a negative pattern value stays negative.
    pub fn forecast(
        &self,
        anchor_mean: Option<f64>,
        period_count: usize,
        period_length: Duration,
        last_known_date: NaiveDate,
    ) -> Vec<ForecastPoint> {
        if period_count == 0 {
            return Vec::new();
        }

        let scale = self.scale_for(anchor_mean);
        let predicted = self.model.predict(period_count, period_length);
        let future = trailing_window(&predicted, period_count);

        let origin = last_known_date.and_time(NaiveTime::MIN);
        future
            .iter()
            .zip(1_i32..)
            .map(|(point, step)| ForecastPoint {
                date: (origin + period_length * step).date(),
                value: point.value * scale,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{PatternPoint, TrendSeasonalModel};
    use chrono::NaiveDateTime;

    /// Model returning a fixed future regardless of the request
    #[derive(Debug)]
    struct FixedModel {
        history: Vec<PatternPoint>,
        future: Vec<f64>,
    }

    impl FixedModel {
        fn new(history: &[f64], future: &[f64]) -> Self {
            let start = NaiveDate::from_ymd_opt(2015, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            Self {
                history: history
                    .iter()
                    .zip(0..)
                    .map(|(&value, i)| PatternPoint {
                        at: start + Duration::days(i),
                        value,
                    })
                    .collect(),
                future: future.to_vec(),
            }
        }
    }

    impl PatternModel for FixedModel {
        fn history(&self) -> &[PatternPoint] {
            &self.history
        }

        fn predict(&self, periods: usize, period_length: Duration) -> Vec<PatternPoint> {
            let last = self
                .history
                .last()
                .map_or_else(NaiveDateTime::default, |p| p.at);
            let mut points = self.history.clone();
            points.extend(self.future.iter().take(periods).zip(1_i32..).map(
                |(&value, step)| PatternPoint {
                    at: last + period_length * step,
                    value,
                },
            ));
            points
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn forecaster(history: &[f64], future: &[f64]) -> ScaledForecaster {
        ScaledForecaster::new(Arc::new(FixedModel::new(history, future)))
    }

    #[test]
    fn test_global_mean() {
        assert_eq!(forecaster(&[2.0, 4.0], &[]).global_mean(), 3.0);
    }

    #[test]
    fn test_global_mean_degenerate_model() {
        assert_eq!(forecaster(&[], &[]).global_mean(), 1.0);
        assert_eq!(forecaster(&[-1.0, 1.0], &[]).global_mean(), 1.0);
    }

    #[test]
    fn test_scale_without_anchor() {
        let f = forecaster(&[5.0], &[]);
        assert_eq!(f.scale_for(None), 1.0);
        assert_eq!(f.scale_for(Some(10.0)), 2.0);
    }

    #[test]
    fn test_unit_scale_keeps_raw_predictions() {
        let f = forecaster(&[10.0, 10.0], &[9.0, 11.0, 12.5]);
        let points = f.forecast(Some(10.0), 3, Duration::days(1), date(2024, 5, 31));

        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![9.0, 11.0, 12.5]);
    }

    #[test]
    fn test_forecast_is_scaled() {
        let f = forecaster(&[2.0, 2.0], &[1.0, 3.0]);
        let points = f.forecast(Some(6.0), 2, Duration::days(1), date(2024, 5, 31));

        assert_eq!(points[0].value, 3.0);
        assert_eq!(points[1].value, 9.0);
    }

    #[test]
    fn test_forecast_is_redated_onto_account_calendar() {
        let f = forecaster(&[1.0], &[1.0; 7]);
        let points = f.forecast(None, 7, Duration::days(1), date(2024, 12, 28));

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, date(2024, 12, 29));
        assert_eq!(points[3].date, date(2025, 1, 1));
        assert!(
            points
                .windows(2)
                .all(|w| w[1].date - w[0].date == Duration::days(1))
        );
    }

    #[test]
    fn test_negative_pattern_is_not_clamped() {
        let f = forecaster(&[1.0], &[-2.0]);
        let points = f.forecast(Some(3.0), 1, Duration::days(1), date(2024, 1, 1));

        assert_eq!(points[0].value, -6.0);
    }

    #[test]
    fn test_zero_periods() {
        let f = forecaster(&[1.0], &[1.0]);
        assert!(
            f.forecast(Some(1.0), 0, Duration::days(1), date(2024, 1, 1))
                .is_empty()
        );
    }

    #[test]
    fn test_takes_only_future_points_from_file_model() {
        let start = date(2016, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let model = TrendSeasonalModel::flat(start, 4.0, 365);
        let f = ScaledForecaster::new(Arc::new(model));

        let points = f.forecast(Some(8.0), 7, Duration::days(1), date(2024, 3, 1));
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.value == 8.0));
        assert_eq!(points[6].date, date(2024, 3, 8));
    }
}
