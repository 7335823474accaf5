//! Axum server exposing the query pipeline over HTTP.
//!
//! Endpoints:
//! - GET /query?q=...&limit=N  - run a natural-language query
//! - GET /api/stats            - ledger summary
//! - GET /healthz              - liveness probe
//! - GET /                     - service info

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cache::ResponseCache;
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::pipeline::QueryPipeline;
use crate::store::LedgerStats;

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    pub cache: Arc<ResponseCache>,
    pub default_limit: usize,
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct QueryParams {
    pub q: String,
    pub limit: Option<usize>,
}

async fn api_query(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Response {
    let q = params.q.trim();
    if q.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "query parameter 'q' must not be empty" })),
        )
            .into_response();
    }

    let limit = params.limit.unwrap_or(state.default_limit);
    let cache_key = format!("{}:{}", q.to_lowercase(), limit);

    if let Some(mut hit) = state.cache.get(&cache_key) {
        hit.cached = true;
        return Json(hit).into_response();
    }

    match state.pipeline.run(q, Some(limit)) {
        Ok(response) => {
            state.cache.put(cache_key, response.clone());
            Json(response).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn api_stats(State(state): State<AppState>) -> Json<LedgerStats> {
    Json(state.pipeline.ledger().stats())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn api_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "tally",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Deterministic natural-language queries over an expense ledger",
        "endpoints": {
            "query": {
                "method": "GET",
                "path": "/query",
                "params": {
                    "q": "Natural-language query (required)",
                    "limit": "Cap for listed transactions (optional)"
                }
            },
            "stats": { "method": "GET", "path": "/api/stats" },
            "health": { "method": "GET", "path": "/healthz" }
        }
    }))
}

// =============================================================================
// SERVER
// =============================================================================

/// Build the router over an already-constructed state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_info))
        .route("/query", get(api_query))
        .route("/api/stats", get(api_stats))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Load the pipeline and serve until interrupted.
pub async fn run(config: &Config) -> Result<()> {
    let pipeline = QueryPipeline::from_config(config)?;
    let stats = pipeline.ledger().stats();
    eprintln!(
        "\x1b[36m>\x1b[0m Loaded {} transactions across {} categories",
        stats.rows, stats.categories
    );

    let state = AppState {
        pipeline: Arc::new(pipeline),
        cache: Arc::new(ResponseCache::new(
            config.cache.max_queries,
            Duration::from_secs(config.cache.query_ttl),
        )),
        default_limit: config.general.default_limit,
    };

    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|_| Error::ServerError {
            message: format!("invalid bind address: {}", config.server.host),
        })?;
    let addr = SocketAddr::new(host, config.server.port);

    eprintln!();
    eprintln!(
        "\x1b[36m>\x1b[0m tally serving at \x1b[36mhttp://{}\x1b[0m",
        addr
    );
    eprintln!("\x1b[90m  Try /query?q=total+spending+this+month\x1b[0m");
    eprintln!("\x1b[90m  Press Ctrl+C to stop\x1b[0m");

    info!(%addr, "Server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Ledger, Transaction};
    use chrono::NaiveDate;

    fn test_state() -> AppState {
        let ledger = Ledger::from_transactions(vec![Transaction {
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            amount: 450,
            category: "food".into(),
            merchant: "swiggy".into(),
        }]);
        AppState {
            pipeline: Arc::new(QueryPipeline::new(ledger)),
            cache: Arc::new(ResponseCache::new(16, Duration::from_secs(60))),
            default_limit: 20,
        }
    }

    #[tokio::test]
    async fn test_query_endpoint_rejects_blank() {
        let state = test_state();
        let response = api_query(
            State(state),
            Query(QueryParams {
                q: "   ".into(),
                limit: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_query_endpoint_ok() {
        let state = test_state();
        let response = api_query(
            State(state),
            Query(QueryParams {
                q: "total spending".into(),
                limit: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_endpoint_caches() {
        let state = test_state();

        let first = api_query(
            State(state.clone()),
            Query(QueryParams {
                q: "total spending".into(),
                limit: None,
            }),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(state.cache.len(), 1);

        let hit = state.cache.get("total spending:20").unwrap();
        assert_eq!(hit.query, "total spending");
    }

    #[tokio::test]
    async fn test_healthz() {
        assert_eq!(healthz().await, StatusCode::OK);
    }
}
