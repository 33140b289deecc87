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

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::{DashboardResponse, LookupResponse};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use wattlens_core::{AccountRegistry, AggregationEngine, ReadingStore};

/// Application state for web handlers
///
/// Everything is loaded before the server starts and never written again, so
/// handlers share it without locks.
#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: Arc<AccountRegistry>,
    pub store: Arc<ReadingStore>,
    pub engine: Arc<AggregationEngine>,
}

impl AppState {
    pub fn new(registry: AccountRegistry, store: ReadingStore, engine: AggregationEngine) -> Self {
        Self {
            registry: Arc::new(registry),
            store: Arc::new(store),
            engine: Arc::new(engine),
        }
    }
}

/// JSON API routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api/accounts", get(handlers::accounts_handler))
        .route("/api/lookup", post(handlers::lookup_handler))
        .route("/api/dashboard", get(handlers::dashboard_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the web server and serve until the process ends
///
/// # Errors
/// Returns error if the address cannot be bound or the server fails
pub async fn start_web_server(state: AppState, bind: &str, port: u16) -> std::io::Result<()> {
    let addr = format!("{bind}:{port}");
    info!(
        "Starting web server on {} ({} accounts)",
        addr,
        state.registry.len()
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await
}
