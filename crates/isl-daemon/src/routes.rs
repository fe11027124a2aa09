//! Axum router and all HTTP handlers for isl-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. Only `/v1/intent-slippage` talks to the upstream API;
//! the other read routes serve whatever the engine currently holds.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use isl_reconcile::Intent;
use tracing::warn;

use crate::{
    api_types::{ErrorResponse, HealthResponse, SlippageResponse, StatusResponse},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/intent-slippage", get(intent_slippage))
        .route("/v1/intents", get(intents))
        .route("/v1/stats", get(stats))
        .route("/v1/status", get(status_handler))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service,
            version: st.build.version,
        }),
    )
}

// ---------------------------------------------------------------------------
// GET /v1/intent-slippage
// ---------------------------------------------------------------------------

/// Refresh from upstream, then return the full dashboard payload.
pub(crate) async fn intent_slippage(State(st): State<Arc<AppState>>) -> Response {
    if let Err(e) = st.refresh().await {
        warn!(error = %e, "intent-slippage refresh failed");
        return (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let (stats, intents) = {
        let engine = st.engine.read().await;
        (engine.compute_statistics(), snapshot(&engine.list_intents()))
    };

    (
        StatusCode::OK,
        Json(SlippageResponse {
            stats,
            intents,
            explorer_urls: st.explorer_urls.clone(),
            last_updated: st.last_updated().await,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /v1/intents
// ---------------------------------------------------------------------------

pub(crate) async fn intents(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = st.engine.read().await;
    Json(snapshot(&engine.list_intents()))
}

// ---------------------------------------------------------------------------
// GET /v1/stats
// ---------------------------------------------------------------------------

/// `null` until at least one intent is filled.
pub(crate) async fn stats(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let engine = st.engine.read().await;
    Json(engine.compute_statistics())
}

// ---------------------------------------------------------------------------
// GET /v1/status
// ---------------------------------------------------------------------------

pub(crate) async fn status_handler(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    let (intents, counts, seen_events) = {
        let engine = st.engine.read().await;
        (engine.len(), engine.status_counts(), engine.seen_event_count())
    };

    Json(StatusResponse {
        initialized: st.is_initialized(),
        intents,
        counts,
        seen_events,
        cached_details: st.fetcher.cached_len().await,
        last_updated: st.last_updated().await,
    })
}

fn snapshot(intents: &[&Intent]) -> Vec<Intent> {
    intents.iter().map(|i| (*i).clone()).collect()
}
