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

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single raw meter reading for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Opaque account identifier (kept as a string, never parsed as a number)
    pub account_id: String,

    /// Local wall-clock time of the reading (no timezone)
    pub timestamp: NaiveDateTime,

    /// Energy consumed during the reading interval (kWh)
    pub consumption: f64,
}

impl Observation {
    pub fn new(account_id: impl Into<String>, timestamp: NaiveDateTime, consumption: f64) -> Self {
        Self {
            account_id: account_id.into(),
            timestamp,
            consumption,
        }
    }

    /// Local calendar date of this reading
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Total consumption of one account on one calendar date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub calendar_date: NaiveDate,
    pub total_consumption: f64,
}

impl DailyAggregate {
    /// First day of the month this date belongs to
    pub fn month_start(&self) -> NaiveDate {
        self.calendar_date
            .with_day(1)
            .unwrap_or(self.calendar_date)
    }
}

/// Total consumption of one account in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    /// First day of the month
    pub calendar_month: NaiveDate,
    pub total_consumption: f64,
}

/// One forecast value re-dated onto the account's calendar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}
