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

use axum::{
    Form, Json,
    extract::{FromRequest, Query, Request, State},
    http::header,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wattlens_core::{AccountInfo, DashboardReport};

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub sample_accounts: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub account_number: String,
}

#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub account_number: String,
    pub dashboard_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub account: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub account_info: AccountInfo,

    #[serde(flatten)]
    pub report: DashboardReport,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Registered account numbers in file order
pub async fn accounts_handler(State(state): State<AppState>) -> Json<AccountsResponse> {
    Json(AccountsResponse {
        sample_accounts: state
            .registry
            .account_numbers()
            .map(ToOwned::to_owned)
            .collect(),
    })
}

/// Validate an account number from a form post or a JSON body
pub async fn lookup_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<LookupResponse>, ApiError> {
    let lookup = decode_lookup(request).await?;
    let account_number = lookup.account_number.trim();

    if account_number.is_empty() {
        return Err(ApiError::MissingAccount);
    }
    if !state.registry.contains(account_number) {
        debug!("Lookup for unknown account {}", account_number);
        return Err(ApiError::UnknownAccount(account_number.to_owned()));
    }

    Ok(Json(LookupResponse {
        account_number: account_number.to_owned(),
        dashboard_url: dashboard_url(account_number)?,
    }))
}

pub async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let account_number = query.account.as_deref().map(str::trim).unwrap_or_default();
    if account_number.is_empty() {
        return Err(ApiError::MissingAccount);
    }

    let account_info = state
        .registry
        .get(account_number)
        .cloned()
        .ok_or_else(|| ApiError::UnknownAccount(account_number.to_owned()))?;

    let observations = state.store.observations(account_number);
    debug!(
        "Building dashboard for {} from {} readings",
        account_number,
        observations.len()
    );
    let report = state.engine.build(observations);

    Ok(Json(DashboardResponse {
        account_info,
        report,
    }))
}

/// Dashboard link with the account number form-encoded into the query
fn dashboard_url(account_number: &str) -> Result<String, ApiError> {
    let query = serde_urlencoded::to_string([("account", account_number)])
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(format!("/api/dashboard?{query}"))
}

async fn decode_lookup(request: Request) -> Result<LookupRequest, ApiError> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if is_json {
        Json::<LookupRequest>::from_request(request, &())
            .await
            .map(|Json(lookup)| lookup)
            .map_err(|e| ApiError::BadRequest(e.body_text()))
    } else {
        Form::<LookupRequest>::from_request(request, &())
            .await
            .map(|Form(lookup)| lookup)
            .map_err(|e| ApiError::BadRequest(e.body_text()))
    }
}
