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

//! Calendar primitives shared by the hourly, daily and monthly rollups

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use wattlens_types::{DailyAggregate, MonthlyAggregate, Observation};

/// Last `size` items of an already sorted slice (all of them if shorter)
pub fn trailing_window<T>(items: &[T], size: usize) -> &[T] {
    let start = items.len().saturating_sub(size);
    &items[start..]
}

/// Group items by an ordered key and sum a value per group
///
/// Output is sorted ascending by key. Items sharing a key are summed, never
/// deduplicated.
pub fn sum_by_key<T, K, I>(
    items: I,
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> f64,
) -> Vec<(K, f64)>
where
    I: IntoIterator<Item = T>,
    K: Ord,
{
    let mut totals: BTreeMap<K, f64> = BTreeMap::new();
    for item in items {
        *totals.entry(key(&item)).or_insert(0.0) += value(&item);
    }
    totals.into_iter().collect()
}

/// Daily totals by local calendar date, oldest first
pub fn aggregate_daily(observations: &[Observation]) -> Vec<DailyAggregate> {
    sum_by_key(observations, |o| o.date(), |o| o.consumption)
        .into_iter()
        .map(|(calendar_date, total_consumption)| DailyAggregate {
            calendar_date,
            total_consumption,
        })
        .collect()
}

/// Monthly totals from a daily series, oldest first
pub fn aggregate_monthly(daily: &[DailyAggregate]) -> Vec<MonthlyAggregate> {
    sum_by_key(daily, |d| d.month_start(), |d| d.total_consumption)
        .into_iter()
        .map(|(calendar_month, total_consumption)| MonthlyAggregate {
            calendar_month,
            total_consumption,
        })
        .collect()
}

/// The `count` most recent raw readings in timestamp order
///
/// The sort is stable, so readings sharing a timestamp keep their input order.
pub fn latest_observations(observations: &[Observation], count: usize) -> Vec<&Observation> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by_key(|o| o.timestamp);
    trailing_window(&sorted, count).to_vec()
}

/// Arithmetic mean, `None` for an empty input
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return None;
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "series lengths never exceed mantissa precision"
    )]
    let count = count as f64;
    Some(sum / count)
}

// Labels use chrono's built-in English names, so they do not depend on the
// host locale.

/// Daily chart label, e.g. "Mar 07"
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Hourly chart label, e.g. "07 Mar\n14:00"
pub fn reading_label(timestamp: NaiveDateTime) -> String {
    timestamp.format("%d %b\n%H:%M").to_string()
}

/// Monthly chart label, e.g. "Mar 2024"
pub fn month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}
