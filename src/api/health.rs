use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::api::server::AppState;
use crate::db::repo;

pub async fn banner() -> &'static str {
    "GLPAAC API is running"
}

pub async fn test_db(State(state): State<Arc<AppState>>) -> Response {
    match repo::database_time(&state.db).await {
        Ok(timestamp) => Json(json!({ "success": true, "timestamp": timestamp })).into_response(),
        Err(e) => {
            error!(error = %e, "Database connection error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Database connection failed" })),
            )
                .into_response()
        }
    }
}
