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

//! Display rounding applied at the serialization boundary.
//!
//! Every value in the data model stays unrounded; these helpers are only used
//! through `#[serde(serialize_with = "...")]` so JSON consumers get the same
//! precision the dashboard has always shown.

use serde::Serializer;

/// Decimal places for energy values (kWh)
pub const ENERGY_DECIMALS: i32 = 3;

/// Decimal places for money values
pub const CURRENCY_DECIMALS: i32 = 2;

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10.0_f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn energy<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, ENERGY_DECIMALS))
}

pub fn currency<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*value, CURRENCY_DECIMALS))
}

pub fn energy_series<S: Serializer>(
    values: &[Option<f64>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        values
            .iter()
            .map(|v| v.map(|v| round_to(v, ENERGY_DECIMALS))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert!((round_to(1.23456, 3) - 1.235).abs() < 1e-12);
        assert!((round_to(150.004, 2) - 150.0).abs() < 1e-12);
        assert!((round_to(-2.5, 0) + 3.0).abs() < 1e-12);
        assert!((round_to(10.0, 3) - 10.0).abs() < 1e-12);
    }
}
