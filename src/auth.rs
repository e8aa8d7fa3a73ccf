use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::TOKEN_TTL_SECS;
use crate::error::{AppError, Result};
use crate::AppState;

/// One-way hash for stored passwords (SHA-256 hex)
///
/// Plaintext is never stored or logged; the hash is compared at login.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// JWT payload carried by every authenticated request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Canonical user ID
    pub sub: String,
    pub email: String,
    /// Expiry (Unix seconds); 7 days from issuance
    pub exp: i64,
}

/// Issue a signed HS256 token for an authenticated user
pub fn issue_token(user_id: &str, email: &str, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AppError::from)
}

/// Verify a bearer token's signature and expiry, returning its claims
///
/// Rejects tokens whose subject claim is empty; the caller treats any
/// failure as a 401.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

    if data.claims.sub.is_empty() {
        return Err(AppError::Unauthorized(
            "Invalid token payload".to_string(),
        ));
    }

    Ok(data.claims)
}

/// The authenticated caller, extracted from the `Authorization` header
///
/// Adding this extractor to a handler is what makes a route protected;
/// extraction fails with a 401 envelope before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
