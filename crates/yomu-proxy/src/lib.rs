//! Catalog search passthrough for browser clients.
//!
//! - `GET /api/manga?q=<term>` — catalog search, or the popular listing when
//!   `q` is empty or absent. The upstream JSON body is relayed as-is.
//! - `GET /health` — liveness probe

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use yomu_api::mangadex::MangaDexClient;
use yomu_core::config::AppConfig;

/// Body of every failed search, whatever went wrong upstream.
pub const FETCH_FAILED: &str = "Failed to fetch manga";

// ── Server state ──────────────────────────────────────────────────────────

pub struct ProxyState {
    client: MangaDexClient,
    config: AppConfig,
}

impl ProxyState {
    pub fn new(config: AppConfig) -> Self {
        let client = MangaDexClient::with_base_url(&config.api.base_url);
        Self::with_client(client, config)
    }

    pub fn with_client(client: MangaDexClient, config: AppConfig) -> Self {
        Self { client, config }
    }
}

// ── Request / response types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ── Router ────────────────────────────────────────────────────────────────

pub fn router(state: Arc<ProxyState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/manga", get(search_manga))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn search_manga(
    State(state): State<Arc<ProxyState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let term = params.q.unwrap_or_default();
    let query = state.config.catalog_query(&term);
    tracing::debug!(term = %term, "proxying catalog search");

    match state.client.search_raw(&query).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(term = %term, error = %e, "catalog search failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: FETCH_FAILED.to_string(),
                }),
            )
                .into_response()
        }
    }
}
