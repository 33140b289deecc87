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

//! Error types for loading models and stores

use thiserror::Error;
use wattlens_types::Granularity;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid pattern model: {0}")]
    Invalid(String),

    #[error("no pattern model loaded for {0} granularity")]
    Missing(Granularity),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{column}' in {file}")]
    MissingColumn { column: &'static str, file: String },

    #[error("invalid row at {file}:{line}: {reason}")]
    InvalidRow {
        file: String,
        line: u64,
        reason: String,
    },
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;
