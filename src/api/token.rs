use std::sync::Arc;

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::server::AppState;
use crate::error::ApiError;

pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

pub fn issue_token(
    secret: &str,
    id: &str,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token_at(secret, id, username, jsonwebtoken::get_current_timestamp())
}

pub fn issue_token_at(
    secret: &str,
    id: &str,
    username: &str,
    issued_at: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        id: id.to_string(),
        username: username.to_string(),
        iat: issued_at,
        exp: issued_at + TOKEN_TTL_SECS,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Checks signature and expiry.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Claims of a verified `Authorization: Bearer <token>` header.
///
/// Rejection happens before the handler runs, so a missing or bad token
/// never reaches the store.
pub struct BearerClaims(pub Claims);

impl FromRequestParts<Arc<AppState>> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split_whitespace().nth(1))
            .ok_or(ApiError::Unauthorized("Access denied. No token provided."))?;

        let claims = verify_token(&state.config.jwt_secret, token).map_err(|e| {
            warn!(error = %e, "Rejected bearer token");
            ApiError::Unauthorized("Invalid token")
        })?;

        Ok(BearerClaims(claims))
    }
}
