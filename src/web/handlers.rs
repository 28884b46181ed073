//! HTTP request handlers

use super::state::AppState;
use crate::providers::ProviderInfo;
use crate::search::{parse_timeout, Query as SearchQuery};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Query parameters for search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Provider name
    pub provider: Option<String>,
    /// Search keyword
    pub keyword: Option<String>,
    /// Page number
    pub page: Option<i64>,
    /// Redirect to the n-th result
    pub goto: Option<usize>,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Timeout such as `5000ms`
    pub timeout: Option<String>,
    /// Sort results by title
    pub sort: Option<bool>,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Provider list handler
pub async fn providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    Json(state.registry.infos())
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let provider = match params.provider {
        Some(p) if !p.trim().is_empty() => p,
        _ => return error_response(StatusCode::BAD_REQUEST, "missing provider"),
    };

    let mut query = SearchQuery::new(provider, params.keyword.unwrap_or_default())
        .with_page(params.page.unwrap_or(1))
        .with_limit(params.limit.unwrap_or(0));
    query.goto = params.goto.unwrap_or(0);

    if let Some(ref raw) = params.timeout {
        match parse_timeout(raw) {
            Some(timeout) => query.timeout = timeout,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid timeout: {}", raw),
                )
            }
        }
    }

    if let Err(e) = state.search.execute(&mut query).await {
        let status = StatusCode::from_u16(query.http_status).unwrap_or(StatusCode::BAD_GATEWAY);
        return error_response(status, e.to_string());
    }

    if params.sort.unwrap_or(false) {
        query.results.sort_by_title();
    }

    if let Some(link) = query.goto_link() {
        return Redirect::to(link).into_response();
    }

    Json(query.results).into_response()
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
