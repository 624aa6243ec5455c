/**
 * CareBridge Server Entry Point
 *
 * Loads configuration from the environment (and `.env`), initializes
 * tracing, and serves the HTTP and WebSocket API.
 */

use carebridge::backend::server::{create_app, AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(env_filter).init(),
    }

    let addr = config.socket_addr()?;
    let app = create_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "CareBridge listening");
    axum::serve(listener, app).await?;

    Ok(())
}
