use anyhow::Result;
use cvtech::{start_web_server, EnvironmentConfig};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cvtech=info,rocket::server=off")),
        )
        .init();

    let port = std::env::var("ROCKET_PORT")
        .ok()
        .map(|p| {
            p.parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))
        })
        .transpose()?
        .unwrap_or(8080);

    let config = EnvironmentConfig::load()?;
    config.ensure_directories().await?;

    info!("Starting CVTech recruiting API server");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, port).await
}
