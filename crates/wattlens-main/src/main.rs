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

mod config;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;
use wattlens_core::{
    AccountRegistry, AggregationEngine, Granularity, PatternModels, ReadingStore,
    ScaledForecaster,
};
use wattlens_web::{AppState, DashboardResponse};

#[derive(Parser)]
#[command(name = "wattlens")]
#[command(author, version, about = "Per-account energy consumption dashboards")]
#[command(
    long_about = "Serves per-account consumption dashboards built from raw meter readings.\n\
    \nEach dashboard holds hourly, daily and monthly charts, a 7-day daily forecast\n\
    rescaled from a shared pre-fitted pattern model, and summary statistics.\n\
    \nExamples:\n  \
    wattlens serve                              # Serve with ./wattlens.toml or defaults\n  \
    wattlens serve --config prod.toml --port 80\n  \
    wattlens report --account 0042 --pretty     # Print one dashboard as JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load data and models, then serve the JSON API
    Serve {
        /// TOML configuration file (defaults to ./wattlens.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the dashboard of one account as JSON
    Report {
        /// Account number exactly as it appears in the accounts CSV
        #[arg(long)]
        account: String,

        /// TOML configuration file (defaults to ./wattlens.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG; stderr keeps `report` output clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default tracing subscriber")?;

    match cli.command {
        Commands::Serve { config, port } => serve(config, port),
        Commands::Report {
            account,
            config,
            pretty,
        } => report(&account, config, pretty),
    }
}

fn serve(config_path: Option<PathBuf>, port: Option<u16>) -> Result<()> {
    let mut config = AppConfig::load(config_path.as_deref())?;
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting WattLens");
    info!("   Accounts: {}", config.data.accounts_csv.display());
    info!("   Readings: {}", config.data.readings_csv.display());
    info!("   Daily model: {}", config.models.daily.display());
    info!(
        "   Window: {} days, forecast {} days, bill rate {}/kWh",
        config.dashboard.trailing_window_days,
        config.dashboard.forecast_horizon_days,
        config.dashboard.bill_rate_per_kwh
    );

    let state = load_state(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    runtime
        .block_on(wattlens_web::start_web_server(
            state,
            &config.server.bind,
            config.server.port,
        ))
        .context("Web server failed")
}

fn report(account: &str, config_path: Option<PathBuf>, pretty: bool) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let state = load_state(&config)?;

    let Some(json) = render_report(&state, account, pretty)? else {
        bail!("Account '{}' not found in {}", account.trim(), config.data.accounts_csv.display());
    };
    println!("{json}");
    Ok(())
}

/// Dashboard JSON for one account, `None` when the account is not registered
fn render_report(state: &AppState, account: &str, pretty: bool) -> Result<Option<String>> {
    let Some(account_info) = state.registry.get(account).cloned() else {
        return Ok(None);
    };

    let response = DashboardResponse {
        report: state.engine.build(state.store.observations(account)),
        account_info,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(Some(json))
}

/// Load registry, readings and the daily pattern model; any failure is fatal
fn load_state(config: &AppConfig) -> Result<AppState> {
    let registry = AccountRegistry::from_path(&config.data.accounts_csv)
        .context("Failed to load accounts")?;
    let store =
        ReadingStore::from_path(&config.data.readings_csv).context("Failed to load readings")?;

    let models = PatternModels::load([(Granularity::Daily, config.models.daily.as_path())])
        .context("Failed to load pattern models")?;
    let engine = AggregationEngine::new(ScaledForecaster::new(models.daily()?))
        .with_policy(config.dashboard.clone());

    Ok(AppState::new(registry, store, engine))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    const ACCOUNTS_CSV: &str = "account_number,customer_name\n0042,Flat Week\n0999,No Readings\n";

    const READINGS_CSV: &str = "account_number,datetime,kwh\n\
        0042,2024-01-01 12:00:00,10.0\n\
        0042,2024-01-02 12:00:00,10.0\n\
        0042,2024-01-03 12:00:00,10.0\n";

    const DAILY_MODEL: &str = r#"{
        "granularity": "daily",
        "history": [
            {"at": "2023-12-30T00:00:00", "value": 10.0},
            {"at": "2023-12-31T00:00:00", "value": 10.0}
        ],
        "trend": {"intercept": 10.0, "slope": 0.0}
    }"#;

    /// Data and model files in a temporary directory, with a config pointing at them
    fn fixture() -> (TempDir, AppConfig) {
        let dir = TempDir::new().unwrap();
        let accounts = dir.path().join("accounts.csv");
        let readings = dir.path().join("readings.csv");
        let daily = dir.path().join("daily.json");
        fs::write(&accounts, ACCOUNTS_CSV).unwrap();
        fs::write(&readings, READINGS_CSV).unwrap();
        fs::write(&daily, DAILY_MODEL).unwrap();

        let mut config = AppConfig::default();
        config.data.accounts_csv = accounts;
        config.data.readings_csv = readings;
        config.models.daily = daily;
        (dir, config)
    }

    #[test]
    fn test_load_state_from_files() {
        let (_dir, config) = fixture();
        let state = load_state(&config).unwrap();

        assert_eq!(state.registry.len(), 2);
        assert_eq!(state.store.observations("0042").len(), 3);
        assert!(state.store.observations("0999").is_empty());
    }

    #[test]
    fn test_load_state_missing_model() {
        let (dir, mut config) = fixture();
        config.models.daily = dir.path().join("missing.json");

        let err = load_state(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to load pattern models"));
    }

    #[test]
    fn test_report_unknown_account() {
        let (_dir, config) = fixture();
        let state = load_state(&config).unwrap();

        assert!(render_report(&state, "1234", false).unwrap().is_none());
    }

    #[test]
    fn test_report_json() {
        let (_dir, config) = fixture();
        let state = load_state(&config).unwrap();

        let json = render_report(&state, " 0042 ", false).unwrap().unwrap();
        assert!(!json.contains('\n'));

        let body: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(body["account_info"]["account_number"], "0042");
        assert_eq!(body["account_info"]["customer_name"], "Flat Week");
        assert_eq!(body["stats"]["total_past"], serde_json::json!(30.0));
        assert_eq!(body["daily_chart"]["labels"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn test_report_pretty_json() {
        let (_dir, config) = fixture();
        let state = load_state(&config).unwrap();

        let json = render_report(&state, "0999", true).unwrap().unwrap();
        assert!(json.contains("\n  \""));

        let body: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(body["account_info"]["customer_name"], "No Readings");
        assert_eq!(body["daily_chart"]["labels"], serde_json::json!([]));
    }
}
