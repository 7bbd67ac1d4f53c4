use std::sync::Arc;

use catalog_api::{
    config::Config,
    routes::{cors_layer, create_router, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let state = Arc::new(AppState::from_config(&config));
    let app = create_router(state).layer(cors_layer(&config.allowed_origins));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
