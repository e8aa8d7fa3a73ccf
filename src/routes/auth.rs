use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, issue_token};
use crate::constants::{ERR_EMAIL_TAKEN, ERR_REGISTER_FIELDS, MIN_NAME_LEN, MIN_PASSWORD_LEN};
use crate::error::{AppError, Result};
use crate::models::{EmailRef, PublicUser, User};
use crate::routes::{ok, ApiResponse};
use crate::store::Entity;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: PublicUser,
    pub token: String,
}

/// Basic shape check; real deliverability is the client's problem
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Register a new user
///
/// Uniqueness is enforced through the email uniqueness record: the check
/// reads `user:email:<email>` and the record is written after the primary
/// User record. A crash between the two writes leaves an orphaned User
/// unreachable by email; that window is accepted and not rolled back.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<PublicUser>>> {
    let (Some(name), Some(email), Some(password)) =
        (payload.name, payload.email, payload.password)
    else {
        return Err(AppError::Validation(ERR_REGISTER_FIELDS.to_string()));
    };

    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();

    if name.len() < MIN_NAME_LEN {
        return Err(AppError::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if Entity::<EmailRef>::exists(&state.db, &email).await? {
        return Err(AppError::Conflict(ERR_EMAIL_TAKEN.to_string()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name,
        email: email.clone(),
        password: Some(hash_password(&password)),
    };

    // Primary record first, uniqueness record second; a reader that sees
    // the email record can always dereference the user
    Entity::<User>::create(&state.db, user.clone()).await?;
    Entity::<EmailRef>::put(
        &state.db,
        EmailRef {
            email,
            id: user.id.clone(),
        },
    )
    .await?;

    tracing::info!("New user registered: {}", user.id);

    Ok(ok(PublicUser::from(user)))
}

/// Authenticate a user and issue a bearer token
///
/// Unknown email, missing user record, and wrong password all return the
/// same "Invalid credentials" failure so accounts cannot be enumerated.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };
    let email = email.trim().to_lowercase();

    if !Entity::<EmailRef>::exists(&state.db, &email).await? {
        return Err(AppError::InvalidCredentials);
    }
    let email_ref = Entity::<EmailRef>::get_state(&state.db, &email).await?;

    if !Entity::<User>::exists(&state.db, &email_ref.id).await? {
        return Err(AppError::InvalidCredentials);
    }
    let user = Entity::<User>::get_state(&state.db, &email_ref.id).await?;

    if user.password.as_deref() != Some(hash_password(&password).as_str()) {
        return Err(AppError::InvalidCredentials);
    }

    let token = issue_token(&user.id, &user.email, &state.config.jwt_secret)?;

    tracing::info!("User logged in: {}", user.id);

    Ok(ok(LoginResponse {
        user: PublicUser::from(user),
        token,
    }))
}
