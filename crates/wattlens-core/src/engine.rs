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

//! Dashboard assembly for a single account
//!
//! The engine is pure: it never logs, never touches the filesystem and never
//! fails. An account without readings yields [`DashboardReport::empty`].

use chrono::Duration;
use wattlens_types::{
    ChartSeries, DailyAggregate, DashboardPolicy, DashboardReport, ForecastPoint, Observation,
    PeakDay, StatsSummary,
};

use crate::calendar::{
    aggregate_daily, aggregate_monthly, day_label, latest_observations, mean, month_label,
    reading_label, trailing_window,
};
use crate::forecast::ScaledForecaster;

/// Turns raw readings into the hourly, daily and monthly charts plus stats
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    forecaster: ScaledForecaster,
    policy: DashboardPolicy,
}

impl AggregationEngine {
    pub fn new(forecaster: ScaledForecaster) -> Self {
        Self {
            forecaster,
            policy: DashboardPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: DashboardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &DashboardPolicy {
        &self.policy
    }

    pub fn forecaster(&self) -> &ScaledForecaster {
        &self.forecaster
    }

    /// Build the full dashboard for one account's readings (any order)
    pub fn build(&self, observations: &[Observation]) -> DashboardReport {
        if observations.is_empty() {
            return DashboardReport::empty();
        }

        let daily = aggregate_daily(observations);
        let window = trailing_window(&daily, self.policy.trailing_window_days);
        let forecast = self.daily_forecast(&daily);

        DashboardReport {
            hourly_chart: self.hourly_chart(observations),
            daily_chart: daily_chart(window, &forecast),
            monthly_chart: monthly_chart(&daily),
            stats: self.stats(window),
            peak_days: self.peak_days(window),
        }
    }

    /// Daily forecast anchored on the mean of the full daily series
    pub fn daily_forecast(&self, daily: &[DailyAggregate]) -> Vec<ForecastPoint> {
        let Some(last_known_date) = daily.iter().map(|d| d.calendar_date).max() else {
            return Vec::new();
        };
        let anchor_mean = mean(daily.iter().map(|d| d.total_consumption));

        self.forecaster.forecast(
            anchor_mean,
            self.policy.forecast_horizon_days,
            Duration::days(1),
            last_known_date,
        )
    }

    fn hourly_chart(&self, observations: &[Observation]) -> ChartSeries {
        let latest = latest_observations(observations, self.policy.hourly_window);
        ChartSeries::history_only(
            latest.iter().map(|o| reading_label(o.timestamp)).collect(),
            latest.iter().map(|o| o.consumption),
        )
    }

    fn stats(&self, window: &[DailyAggregate]) -> StatsSummary {
        let Some(avg_past) = mean(window.iter().map(|d| d.total_consumption)) else {
            return StatsSummary::default();
        };
        let total_past: f64 = window.iter().map(|d| d.total_consumption).sum();

        // Strict comparison keeps the earliest of several equal maxima
        let mut max_day = &window[0];
        for day in &window[1..] {
            if day.total_consumption > max_day.total_consumption {
                max_day = day;
            }
        }

        StatsSummary {
            total_past,
            avg_past,
            max_day_label: day_label(max_day.calendar_date),
            max_day_value: max_day.total_consumption,
            estimated_bill: self.policy.estimate_bill(total_past),
        }
    }

    fn peak_days(&self, window: &[DailyAggregate]) -> Vec<PeakDay> {
        let mut ranked: Vec<&DailyAggregate> = window.iter().collect();
        // Stable: equal totals keep ascending date order
        ranked.sort_by(|a, b| b.total_consumption.total_cmp(&a.total_consumption));

        ranked
            .into_iter()
            .take(self.policy.peak_day_count)
            .map(|d| PeakDay {
                label: day_label(d.calendar_date),
                value: d.total_consumption,
            })
            .collect()
    }
}

/// History for the window, then forecast, never both at one index
fn daily_chart(window: &[DailyAggregate], forecast: &[ForecastPoint]) -> ChartSeries {
    let labels = window
        .iter()
        .map(|d| day_label(d.calendar_date))
        .chain(forecast.iter().map(|p| day_label(p.date)))
        .collect();

    let history = window
        .iter()
        .map(|d| Some(d.total_consumption))
        .chain(forecast.iter().map(|_| None))
        .collect();

    let forecast = window
        .iter()
        .map(|_| None)
        .chain(forecast.iter().map(|p| Some(p.value)))
        .collect();

    ChartSeries {
        labels,
        history,
        forecast,
    }
}

fn monthly_chart(daily: &[DailyAggregate]) -> ChartSeries {
    let monthly = aggregate_monthly(daily);
    ChartSeries::history_only(
        monthly.iter().map(|m| month_label(m.calendar_month)).collect(),
        monthly.iter().map(|m| m.total_consumption),
    )
}
