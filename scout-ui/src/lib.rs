//! scout-ui library - PrintScout web service
//!
//! Two pages over one table and two upstream services: a search page that
//! refines a free-text wish and queues print requests, and a review page
//! that works the queue down.

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod session;

pub use error::{ApiError, ApiResult};

use services::{ImageSearch, QueryRefiner};
use session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Image search client
    pub search: Arc<dyn ImageSearch>,
    /// Query refiner client
    pub refiner: Arc<dyn QueryRefiner>,
    /// Per-session state (refined query, one-shot notices)
    pub sessions: Arc<SessionStore>,
    /// True when any credential fell back to a placeholder value
    pub placeholder_credentials: bool,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        search: Arc<dyn ImageSearch>,
        refiner: Arc<dyn QueryRefiner>,
        placeholder_credentials: bool,
    ) -> Self {
        Self {
            db,
            search,
            refiner,
            sessions: Arc::new(SessionStore::new()),
            placeholder_credentials,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::search_page))
        .route("/search/refine", post(api::refine_search))
        .route("/requests", post(api::create_request))
        .route("/queue", get(api::queue_page))
        .route("/queue/:id/printed", post(api::mark_request_printed))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
