use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::constants::MIN_NAME_LEN;
use crate::error::{AppError, Result};
use crate::models::{PublicUser, User};
use crate::routes::{ok, ApiResponse};
use crate::store::Entity;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
}

/// Update the caller's display name
///
/// The only mutable User field; `id` and `email` are fixed at
/// registration.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<PublicUser>>> {
    let Some(name) = payload.name else {
        return Err(AppError::Validation("Name is required".to_string()));
    };
    let name = name.trim().to_string();
    if name.len() < MIN_NAME_LEN {
        return Err(AppError::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }

    if !Entity::<User>::exists(&state.db, &auth.id).await? {
        return Err(AppError::NotFound("User"));
    }

    let updated = Entity::<User>::mutate(&state.db, &auth.id, move |mut user| {
        user.name = name;
        user
    })
    .await?;

    Ok(ok(PublicUser::from(updated)))
}
