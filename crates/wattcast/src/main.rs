use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wattcast::api::{create_routes, AppState};
use wattcast::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wattcast=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::default();
    let listen_addr = config.listen_addr.clone();
    let max_upload_bytes = config.max_upload_bytes;

    let state = Arc::new(AppState::new(config));
    let app = create_routes(max_upload_bytes).with_state(state);

    tracing::info!(addr = %listen_addr, "starting wattcast");
    let listener = TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
