use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::password::{hash_password, verify_password};
use crate::api::payloads::{LoginRequest, LoginResponse, MeResponse, SignupRequest, SignupResponse};
use crate::api::server::AppState;
use crate::api::token::{BearerClaims, issue_token};
use crate::db::models::{USER_PROFILE, User};
use crate::db::repo;
use crate::error::{ApiError, internal};

const SIGNUP_FAILED: &str = "Server error during registration";
const LOGIN_FAILED: &str = "Server error during login";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let taken = repo::username_or_email_taken(&state.db, &payload.username, &payload.email)
        .await
        .map_err(internal(SIGNUP_FAILED))?;
    if taken {
        return Err(ApiError::Conflict("Username or email already exists"));
    }

    let password_hash = hash_password(&payload.password).map_err(internal(SIGNUP_FAILED))?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: payload.username,
        email: payload.email,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    // Two independent writes: a failure between them leaves a user without
    // a profile, which the voice-settings save recreates lazily.
    repo::insert_user(&state.db, &user)
        .await
        .map_err(internal(SIGNUP_FAILED))?;
    repo::insert_profile(&state.db, &user.id, USER_PROFILE, "{}")
        .await
        .map_err(internal(SIGNUP_FAILED))?;

    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User registered successfully".to_string(),
            user: user.summary(),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = repo::get_user_by_username(&state.db, &payload.username)
        .await
        .map_err(internal(LOGIN_FAILED))?
    else {
        warn!(username = %payload.username, "Login for unknown user");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let valid =
        verify_password(&payload.password, &user.password_hash).map_err(internal(LOGIN_FAILED))?;
    if !valid {
        warn!(username = %payload.username, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = issue_token(&state.config.jwt_secret, &user.id, &user.username)
        .map_err(internal(LOGIN_FAILED))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.to_public(),
    }))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<MeResponse>, ApiError> {
    let user = repo::get_user_by_id(&state.db, &claims.id)
        .await
        .map_err(internal("Server error"))?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(MeResponse {
        user: user.to_public(),
    }))
}
