use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rental_web::{app, config::Config, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_web=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded (payment timeout {:?}, session idle {:?})",
        config.payment_timeout,
        config.session_idle
    );

    let state = AppState::new(&config);
    let router = app(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
