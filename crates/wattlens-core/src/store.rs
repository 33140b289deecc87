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

//! CSV-backed account registry and reading store
//!
//! Both are loaded once at startup and only read afterwards. Identifiers are
//! always kept as trimmed strings, never parsed as numbers.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use tracing::{info, warn};
use wattlens_types::{AccountInfo, Observation};

use crate::error::{StoreError, StoreResult};

const ACCOUNT_COLUMN: &str = "account_number";
const DATETIME_COLUMN: &str = "datetime";
const KWH_COLUMN: &str = "kwh";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn csv_reader<R: io::Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn column_index(
    headers: &csv::StringRecord,
    column: &'static str,
    file: &str,
) -> StoreResult<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| StoreError::MissingColumn {
            column,
            file: file.to_owned(),
        })
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}

/// Known accounts in file order, indexed by account number
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    accounts: Vec<AccountInfo>,
    index: HashMap<String, usize>,
}

impl AccountRegistry {
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse an accounts CSV; `name` only appears in errors and logs
    pub fn from_reader<R: io::Read>(input: R, name: &str) -> StoreResult<Self> {
        let mut reader = csv_reader(input);
        let headers = reader.headers()?.clone();
        let id_column = column_index(&headers, ACCOUNT_COLUMN, name)?;

        let mut registry = Self::default();
        for result in reader.records() {
            let record = result?;
            let account_number = record.get(id_column).unwrap_or_default();
            if account_number.is_empty() {
                return Err(StoreError::InvalidRow {
                    file: name.to_owned(),
                    line: line_of(&record),
                    reason: "empty account number".to_owned(),
                });
            }
            if registry.contains(account_number) {
                warn!(
                    "Skipping duplicate account {} at {}:{}",
                    account_number,
                    name,
                    line_of(&record)
                );
                continue;
            }

            let account = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != id_column)
                .fold(AccountInfo::new(account_number), |info, (_, (key, value))| {
                    info.with_field(key, value)
                });
            registry.push(account);
        }

        info!("Loaded {} accounts from {}", registry.len(), name);
        Ok(registry)
    }

    fn push(&mut self, account: AccountInfo) {
        self.index
            .insert(account.account_number.clone(), self.accounts.len());
        self.accounts.push(account);
    }

    pub fn get(&self, account_number: &str) -> Option<&AccountInfo> {
        self.index
            .get(account_number.trim())
            .and_then(|&idx| self.accounts.get(idx))
    }

    pub fn contains(&self, account_number: &str) -> bool {
        self.index.contains_key(account_number.trim())
    }

    /// Account numbers in file order
    pub fn account_numbers(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|a| a.account_number.as_str())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl FromIterator<AccountInfo> for AccountRegistry {
    /// First occurrence of an account number wins
    fn from_iter<I: IntoIterator<Item = AccountInfo>>(iter: I) -> Self {
        let mut registry = Self::default();
        for account in iter {
            if !registry.contains(&account.account_number) {
                registry.push(account);
            }
        }
        registry
    }
}

/// Raw readings grouped by account, in file order
#[derive(Debug, Clone, Default)]
pub struct ReadingStore {
    readings: HashMap<String, Vec<Observation>>,
}

impl ReadingStore {
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &path.display().to_string())
    }

    pub fn from_reader<R: io::Read>(input: R, name: &str) -> StoreResult<Self> {
        let mut reader = csv_reader(input);
        let headers = reader.headers()?.clone();
        let id_column = column_index(&headers, ACCOUNT_COLUMN, name)?;
        let datetime_column = column_index(&headers, DATETIME_COLUMN, name)?;
        let kwh_column = column_index(&headers, KWH_COLUMN, name)?;

        let mut observations = Vec::new();
        for result in reader.records() {
            let record = result?;
            let invalid = |reason: String| StoreError::InvalidRow {
                file: name.to_owned(),
                line: line_of(&record),
                reason,
            };

            let account_id = record.get(id_column).unwrap_or_default();
            if account_id.is_empty() {
                return Err(invalid("empty account number".to_owned()));
            }

            let raw_datetime = record.get(datetime_column).unwrap_or_default();
            let timestamp = parse_timestamp(raw_datetime)
                .ok_or_else(|| invalid(format!("invalid datetime '{raw_datetime}'")))?;

            let raw_kwh = record.get(kwh_column).unwrap_or_default();
            let consumption = raw_kwh
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| invalid(format!("invalid kwh '{raw_kwh}'")))?;

            observations.push(Observation::new(account_id, timestamp, consumption));
        }

        let store = Self::from_observations(observations);
        info!(
            "Loaded {} readings for {} accounts from {}",
            store.reading_count(),
            store.account_count(),
            name
        );
        Ok(store)
    }

    pub fn from_observations(observations: impl IntoIterator<Item = Observation>) -> Self {
        let mut readings: HashMap<String, Vec<Observation>> = HashMap::new();
        for observation in observations {
            readings
                .entry(observation.account_id.clone())
                .or_default()
                .push(observation);
        }
        Self { readings }
    }

    /// Readings of one account; empty for accounts without any
    pub fn observations(&self, account_number: &str) -> &[Observation] {
        self.readings
            .get(account_number.trim())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn account_count(&self) -> usize {
        self.readings.len()
    }

    pub fn reading_count(&self) -> usize {
        self.readings.values().map(Vec::len).sum()
    }
}

/// Parse a reading timestamp; a bare date means midnight
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
}
