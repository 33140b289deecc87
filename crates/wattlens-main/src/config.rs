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

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wattlens_core::DashboardPolicy;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "wattlens.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub models: ModelsConfig,

    #[serde(default)]
    pub dashboard: DashboardPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    8099
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Account registry (`account_number` plus metadata columns)
    #[serde(default = "default_accounts_csv")]
    pub accounts_csv: PathBuf,

    /// Raw readings (`account_number`, `datetime`, `kwh`)
    #[serde(default = "default_readings_csv")]
    pub readings_csv: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            accounts_csv: default_accounts_csv(),
            readings_csv: default_readings_csv(),
        }
    }
}

fn default_accounts_csv() -> PathBuf {
    PathBuf::from("data/accounts.csv")
}

fn default_readings_csv() -> PathBuf {
    PathBuf::from("data/readings.csv")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Pre-fitted daily pattern model (JSON)
    #[serde(default = "default_daily_model")]
    pub daily: PathBuf,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            daily: default_daily_model(),
        }
    }
}

fn default_daily_model() -> PathBuf {
    PathBuf::from("data/models/daily.json")
}

impl AppConfig {
    /// Load from an explicit path, `./wattlens.toml`, or defaults, then apply
    /// environment overrides and validate
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                warn!("No configuration file found, using defaults with environment overrides");
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override paths and port from `WATTLENS_*` variables
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = var("WATTLENS_ACCOUNTS_CSV") {
            self.data.accounts_csv = PathBuf::from(path);
        }
        if let Some(path) = var("WATTLENS_READINGS_CSV") {
            self.data.readings_csv = PathBuf::from(path);
        }
        if let Some(path) = var("WATTLENS_DAILY_MODEL") {
            self.models.daily = PathBuf::from(path);
        }
        if let Some(port) = var("WATTLENS_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("WATTLENS_PORT must be a port number, got '{port}'"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            bail!("server.bind cannot be empty");
        }

        for (name, path) in [
            ("data.accounts_csv", &self.data.accounts_csv),
            ("data.readings_csv", &self.data.readings_csv),
            ("models.daily", &self.models.daily),
        ] {
            if path.as_os_str().is_empty() {
                bail!("{} cannot be empty", name);
            }
        }

        let policy = &self.dashboard;
        if policy.trailing_window_days == 0 {
            bail!("dashboard.trailing_window_days must be at least 1");
        }
        if policy.hourly_window == 0 {
            bail!("dashboard.hourly_window must be at least 1");
        }
        if policy.peak_day_count == 0 {
            bail!("dashboard.peak_day_count must be at least 1");
        }
        if !policy.bill_rate_per_kwh.is_finite() || policy.bill_rate_per_kwh < 0.0 {
            bail!(
                "dashboard.bill_rate_per_kwh must be a non-negative number, got {}",
                policy.bill_rate_per_kwh
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.server.port, 8099);
        assert_eq!(config.data.accounts_csv, PathBuf::from("data/accounts.csv"));
        assert_eq!(config.dashboard, DashboardPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [dashboard]
            bill_rate_per_kwh = 0.21
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.dashboard.trailing_window_days, 30);
        assert!((config.dashboard.bill_rate_per_kwh - 0.21).abs() < f64::EPSILON);
        assert_eq!(config.models.daily, PathBuf::from("data/models/daily.json"));
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();

        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[data]\naccounts_csv = \"/srv/accounts.csv\"").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.data.accounts_csv, PathBuf::from("/srv/accounts.csv"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/wattlens.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"eighty\"").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[
                ("WATTLENS_READINGS_CSV", "/tmp/r.csv"),
                ("WATTLENS_DAILY_MODEL", "/tmp/daily.json"),
                ("WATTLENS_PORT", "8123"),
            ]))
            .unwrap();

        assert_eq!(config.data.readings_csv, PathBuf::from("/tmp/r.csv"));
        assert_eq!(config.models.daily, PathBuf::from("/tmp/daily.json"));
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.data.accounts_csv, PathBuf::from("data/accounts.csv"));
    }

    #[test]
    fn test_env_bad_port() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(env(&[("WATTLENS_PORT", "http")]))
            .unwrap_err();

        assert!(err.to_string().contains("WATTLENS_PORT"));
    }

    #[test]
    fn test_validate_rejects_bad_policy() {
        let mut config = AppConfig::default();
        config.dashboard.trailing_window_days = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.dashboard.bill_rate_per_kwh = -0.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.dashboard.bill_rate_per_kwh = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.models.daily = PathBuf::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("models.daily"));
    }
}
