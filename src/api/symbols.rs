use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::api::server::AppState;

/// A failed upstream call, relayed with the upstream status when there was one.
#[derive(Error, Debug)]
#[error("symbol API responded {status}")]
pub struct SymbolsError {
    pub status: StatusCode,
    pub details: Value,
}

impl SymbolsError {
    fn transport(e: reqwest::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            details: Value::String(e.to_string()),
        }
    }
}

impl IntoResponse for SymbolsError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": "Failed to fetch symbols", "details": self.details })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SymbolQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SymbolQuery>,
) -> Result<Json<Value>, SymbolsError> {
    fetch_symbols(
        &state.http,
        &state.config.symbols_api_url,
        &state.config.symbols_access_key,
        &query.q,
    )
    .await
    .map(Json)
    .inspect_err(|e| error!(status = %e.status, details = %e.details, "OpenSymbols API error"))
}

/// Forwards `q` with the server-held access key. No caching, no retries.
pub async fn fetch_symbols(
    client: &reqwest::Client,
    url: &str,
    access_key: &str,
    q: &str,
) -> Result<Value, SymbolsError> {
    let response = client
        .get(url)
        .query(&[("access_token", access_key), ("q", q)])
        .send()
        .await
        .map_err(SymbolsError::transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let details = serde_json::from_str(&body).unwrap_or(Value::String(body));
        return Err(SymbolsError { status, details });
    }

    response.json().await.map_err(SymbolsError::transport)
}

#[cfg(test)]
mod tests {
    use crate::api::testing::{send, test_state};
    use axum::http::{Method, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_success_body_is_relayed() {
        let upstream = MockServer::start();
        let mock = upstream.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/symbols")
                .query_param("q", "cats")
                .query_param("access_token", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"image_url":"https://img/cat.png","name":"cat","id":7}]"#);
        });

        let state = test_state(&upstream.url("/api/v2/symbols")).await;
        let (status, body) = send(&state, Method::GET, "/api/symbols?q=cats", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{ "image_url": "https://img/cat.png", "name": "cat", "id": 7 }])
        );
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_upstream_status_is_passed_through() {
        let upstream = MockServer::start();
        upstream.mock(|when, then| {
            when.method(GET).path("/api/v2/symbols");
            then.status(503)
                .header("content-type", "application/json")
                .body(r#"{"error":"maintenance"}"#);
        });

        let state = test_state(&upstream.url("/api/v2/symbols")).await;
        let (status, body) = send(&state, Method::GET, "/api/symbols?q=dog", None, None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({ "error": "Failed to fetch symbols", "details": { "error": "maintenance" } })
        );
    }

    #[tokio::test]
    async fn test_missing_query_forwards_empty_term() {
        let upstream = MockServer::start();
        let mock = upstream.mock(|when, then| {
            when.method(GET)
                .path("/api/v2/symbols")
                .query_param("q", "");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        let state = test_state(&upstream.url("/api/v2/symbols")).await;
        let (status, body) = send(&state, Method::GET, "/api/symbols", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
        mock.assert_calls(1);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_500() {
        let state = test_state("http://127.0.0.1:9/unreachable").await;
        let (status, body) = send(&state, Method::GET, "/api/symbols?q=x", None, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to fetch symbols");
        assert!(body["details"].is_string());
    }
}
