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

//! WattLens aggregation and forecast engine
//!
//! Turns the raw readings of one account into chart-ready rollups (hourly
//! window, daily and monthly series), a short daily forecast shaped by a
//! shared pre-fitted pattern model, and summary statistics.
//!
//! ## Modules
//!
//! - **calendar**: trailing-window selection and group-by-calendar-unit sums
//! - **forecast**: the `PatternModel` seam, the file-backed model and the
//!   `ScaledForecaster`
//! - **engine**: `AggregationEngine::build`, the single dashboard entry point
//! - **store**: CSV-backed account registry and reading store

pub mod calendar;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod store;

pub use engine::AggregationEngine;
pub use error::{ModelError, ModelResult, StoreError, StoreResult};
pub use forecast::{
    PatternModel, PatternModels, PatternPoint, ScaledForecaster, TrendSeasonalModel,
};
pub use store::{AccountRegistry, ReadingStore};

// Re-export the data model so consumers only need this crate
pub use wattlens_types::*;
