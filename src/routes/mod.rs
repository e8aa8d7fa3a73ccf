pub mod auth;
pub mod habits;
pub mod health;
pub mod user;

pub use auth::{login, register};
pub use habits::{create_habit, delete_habit, list_habits, log_habit, update_habit};
pub use health::health_check;
pub use user::update_profile;

use axum::Json;
use serde::Serialize;

/// Uniform response envelope: `{success, data?, error?}`
///
/// Successes go through `ok`; failures are rendered by
/// `AppError::into_response` with the same shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wrap a payload in a successful envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data: Some(data),
        error: None,
    })
}
