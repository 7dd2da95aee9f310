use glpaac::api;
use glpaac::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    tracing::info!("Starting GLPAAC backend...");

    let config = Config::load()?;
    api::server::start_server(config).await
}
