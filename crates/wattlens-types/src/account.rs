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

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registry entry for one account
///
/// `metadata` holds every other column of the registry row (customer name,
/// tariff, address, ...) as plain strings keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: String,

    #[serde(flatten)]
    pub metadata: BTreeMap<String, String>,
}

impl AccountInfo {
    pub fn new(account_number: impl Into<String>) -> Self {
        Self {
            account_number: account_number.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_is_flattened() {
        let info = AccountInfo::new("0042").with_field("customer_name", "Ada");

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["account_number"], "0042");
        assert_eq!(json["customer_name"], "Ada");
        assert_eq!(info.field("customer_name"), Some("Ada"));
        assert_eq!(info.field("tariff"), None);
    }
}
