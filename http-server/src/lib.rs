//! HTTP transport for the song catalog.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ axum router + handlers       │  query/body parsing, status mapping
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │ core_service::SongService    │  orchestration, lyrics paging
//! └──────────────┬───────────────┘
//!                │
//! ┌──────────────▼───────────────┐
//! │ core_library repositories    │  SQLite via sqlx
//! └──────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::ApiError;

use axum::routing::{delete, get, post, put};
use axum::Router;
use core_service::SongService;
use sqlx::SqlitePool;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: SongService,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(service: SongService, pool: SqlitePool) -> Self {
        Self { service, pool }
    }
}

/// Build the application router with request logging applied to every route.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/songs", get(handlers::list_songs))
        .route("/songs/create", post(handlers::create_song))
        .route("/songs/update", put(handlers::update_song))
        .route("/songs/info", get(handlers::get_song))
        .route("/songs/delete", delete(handlers::delete_song))
        .route("/songs/{id}/lyrics", get(handlers::get_lyrics))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}
