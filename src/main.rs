use anyhow::Result;
use cv_lens::{start_web_server, EnvironmentConfig, GeminiClient};

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("cv_lens=INFO,rocket::server=OFF")),
        )
        .init();

    let api_key = std::env::var("GOOGLE_API_KEY")
        .map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY environment variable not set"))?;

    let port = std::env::var("ROCKET_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()
        .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;

    let config = EnvironmentConfig::load()?;
    let gemini = GeminiClient::new(&config, api_key)?;

    info!("Starting resume extraction and cover letter API server");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, gemini).await
}
