//! notekeep - musical phrase tracker
//!
//! Records short musical phrases per user, entered as compact notation or
//! transcribed from an uploaded sheet music image by an external multimodal
//! inference service, and persists the latest phrase in SQLite.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod notation;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::SheetTranscriber;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Sheet transcription seam (real client in production, fake in tests)
    pub transcriber: Arc<dyn SheetTranscriber>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, transcriber: Arc<dyn SheetTranscriber>) -> Self {
        Self {
            db,
            transcriber,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::phrase_routes())
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
