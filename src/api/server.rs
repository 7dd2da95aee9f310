use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{auth, health, symbols, user_settings};
use crate::config::Config;
use crate::db;

pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config,
            http: reqwest::Client::new(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/api/test-db", get(health::test_db))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/user-settings/voice",
            get(user_settings::get_voice).post(user_settings::save_voice),
        )
        .route("/api/symbols", get(symbols::search))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let pool = db::connect(&config.database_url).await?;
    let port = config.port;

    let state = Arc::new(AppState::new(pool, config));

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on port {port}");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
