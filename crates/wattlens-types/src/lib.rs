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

pub mod account;
pub mod chart;
pub mod config;
pub mod display;
pub mod reading;

// Re-export common types for convenience
pub use account::AccountInfo;
pub use chart::{ChartSeries, DashboardReport, PeakDay, StatsSummary};
pub use config::{DashboardPolicy, Granularity};
pub use reading::{DailyAggregate, ForecastPoint, MonthlyAggregate, Observation};
