mod routes;
mod singleton;
mod state;

use anyhow::Result;
use legends_core::config::LegendsConfig;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,legends_core=info,tower_http=debug",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LegendsConfig::load()?;

    // Ensure only one instance serves this data directory
    let _lock = singleton::acquire_lock(&config.data_path())?;
    let state = AppState::load(&config)?;

    let app = routes::router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    tracing::info!("legends-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
