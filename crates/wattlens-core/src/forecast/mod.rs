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

pub mod model;
pub mod scaled;

pub use model::{LinearTrend, TrendSeasonalModel};
pub use scaled::ScaledForecaster;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use wattlens_types::Granularity;

use crate::error::{ModelError, ModelResult};

/// One point on a pattern model's own timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternPoint {
    pub at: NaiveDateTime,
    pub value: f64,
}

/// A pre-fitted, read-only forecaster used as a shape template
///
/// Implementations are shared across threads for the lifetime of the process
/// and must never change after construction.
pub trait PatternModel: fmt::Debug + Send + Sync {
    /// In-sample fitted series, oldest first
    fn history(&self) -> &[PatternPoint];

    /// Extend the model's own timeline by `periods` steps of `period_length`
    ///
    /// The returned points may start with the in-sample fit; the last
    /// `periods` points are always the future extension.
    fn predict(&self, periods: usize, period_length: Duration) -> Vec<PatternPoint>;
}

/// Pattern models keyed by the granularity they were fitted on
#[derive(Debug, Clone, Default)]
pub struct PatternModels {
    models: BTreeMap<Granularity, Arc<dyn PatternModel>>,
}

impl PatternModels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, granularity: Granularity, model: Arc<dyn PatternModel>) {
        self.models.insert(granularity, model);
    }

    pub fn get(&self, granularity: Granularity) -> ModelResult<Arc<dyn PatternModel>> {
        self.models
            .get(&granularity)
            .cloned()
            .ok_or(ModelError::Missing(granularity))
    }

    /// Model backing the daily forecast (required at startup)
    pub fn daily(&self) -> ModelResult<Arc<dyn PatternModel>> {
        self.get(Granularity::Daily)
    }

    pub fn granularities(&self) -> impl Iterator<Item = Granularity> + '_ {
        self.models.keys().copied()
    }

    /// Load one JSON model file per granularity
    pub fn load<'a>(
        files: impl IntoIterator<Item = (Granularity, &'a Path)>,
    ) -> ModelResult<Self> {
        let mut models = Self::new();
        for (granularity, path) in files {
            let model = TrendSeasonalModel::from_file(path)?;
            if model.granularity != granularity {
                return Err(ModelError::Invalid(format!(
                    "{} was fitted for {} data but configured as the {} model",
                    path.display(),
                    model.granularity,
                    granularity
                )));
            }
            info!(
                "Loaded {} pattern model from {} ({} history points)",
                granularity,
                path.display(),
                model.history.len()
            );
            models.insert(granularity, Arc::new(model));
        }
        Ok(models)
    }
}
