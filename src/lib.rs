//! Ritual Server Library
//!
//! Habit-tracking backend: entity/index persistence over an embedded
//! key-value store, JWT auth, and the habit CRUD + progress-log API.

pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use config::Config;
pub use db::{open_database, Db};
pub use error::{AppError, Result};

use axum::{
    routing::{get, post, put},
    Router,
};

use routes::{
    create_habit, delete_habit, health_check, list_habits, log_habit, login, register,
    update_habit, update_profile,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with the given database and configuration
    pub fn new(db: Db, config: Config) -> Self {
        Self { db, config }
    }
}

/// Build the application router
///
/// Everything under `/api` except `/api/auth/*` requires a bearer token,
/// enforced by the `AuthUser` extractor on each protected handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/user/profile", put(update_profile))
        .route("/api/habits", get(list_habits).post(create_habit))
        .route("/api/habits/:id", put(update_habit).delete(delete_habit))
        .route("/api/habits/:id/log", post(log_habit))
        .with_state(state)
}
