use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::api::payloads::{
    AckResponse, LoginRequest, LoginResponse, MeResponse, PublicUser, SignupRequest,
    SignupResponse, Symbol, VoiceSettings, VoiceSettingsResponse,
};
use crate::client::symbol_search::SymbolSource;
use crate::client::voice::VoiceSettingsRemote;
use crate::config::ClientConfig;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }
}

/// REST client for the GLPAAC backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&request)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn me(&self, token: &str) -> Result<PublicUser, ClientError> {
        let response = self
            .http
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        decode::<MeResponse>(response).await.map(|body| body.user)
    }

    pub async fn get_voice_settings(&self, token: &str) -> Result<VoiceSettings, ClientError> {
        let response = self
            .http
            .get(self.url("/api/user-settings/voice"))
            .bearer_auth(token)
            .send()
            .await?;
        decode::<VoiceSettingsResponse>(response)
            .await
            .map(|body| body.settings)
    }

    pub async fn save_voice_settings(
        &self,
        token: &str,
        settings: &VoiceSettings,
    ) -> Result<AckResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/user-settings/voice"))
            .bearer_auth(token)
            .json(settings)
            .send()
            .await?;
        decode(response).await
    }

    pub async fn search_symbols(&self, query: &str) -> Result<Vec<Symbol>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/symbols"))
            .query(&[("q", query)])
            .send()
            .await?;
        decode(response).await
    }
}

/// 2xx bodies decode into `T`; anything else becomes [`ClientError::Api`]
/// carrying the server's `message` (or the proxy's `error`).
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    Err(ClientError::Api { status, message })
}

#[async_trait]
impl VoiceSettingsRemote for ApiClient {
    async fn fetch_voice_settings(&self, token: &str) -> Result<VoiceSettings, ClientError> {
        self.get_voice_settings(token).await
    }

    async fn store_voice_settings(
        &self,
        token: &str,
        settings: &VoiceSettings,
    ) -> Result<(), ClientError> {
        self.save_voice_settings(token, settings).await.map(|_| ())
    }
}

#[async_trait]
impl SymbolSource for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<Symbol>, ClientError> {
        self.search_symbols(query).await
    }
}
