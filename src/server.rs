//! HTTP API serving the extraction as JSON.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /` | health payload |
//! | `GET /today?url=&mode=` | extraction JSON (`mode` defaults to `full`) |
//!
//! Failures map to distinct statuses: 502 when the source page could not be
//! fetched, 404 when it was fetched but no forecast section was found, 400 for
//! an unparsable `url` override, 500 for anything else.

use crate::errors::ScrapeError;
use crate::extract::ExtractMode;
use crate::scrapers::tenki::{Fetcher, parse_url, scrape};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use url::Url;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Fetcher,
    pub default_url: Url,
    pub city: Arc<str>,
}

/// Query params for `/today`
#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    pub url: Option<String>,
    #[serde(default)]
    pub mode: ExtractMode,
}

/// Handler failure with its HTTP status.
#[derive(Debug)]
pub enum ApiError {
    Scrape(ScrapeError),
    Internal(String),
}

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        ApiError::Scrape(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Scrape(ScrapeError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Scrape(ScrapeError::StructureChanged) => StatusCode::NOT_FOUND,
            ApiError::Scrape(ScrapeError::InvalidUrl { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Scrape(e) => e.to_string(),
            ApiError::Internal(e) => e.clone(),
        };
        if status.is_server_error() {
            error!(%status, error = %message, "Request failed");
        } else {
            warn!(%status, error = %message, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// GET / - Health check
async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "endpoints": ["/today"] }))
}

/// GET /today - Fetch and extract the forecast page
async fn today(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<Value>, ApiError> {
    let url = match query.url.as_deref() {
        Some(raw) => parse_url(raw)?,
        None => state.default_url.clone(),
    };
    let extraction = scrape(&state.fetcher, &url, query.mode, &state.city).await?;
    let body = extraction
        .to_json()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(body))
}

/// Create the HTTP router
pub fn create_router(state: AppState) -> Router {
    // spreadsheet add-ins call this from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/today", get(today))
        .layer(cors)
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_http_server(state: AppState, bind: &str, port: u16) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind, port)).await?;
    info!(%bind, port, "HTTP server listening");

    axum::serve(listener, app).await
}
