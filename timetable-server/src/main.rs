mod routes;
mod state;

use anyhow::Result;
use timetable_core::config::TimetableConfig;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = TimetableConfig::load()?;
    let addr = config.listen_addr()?;
    let state = AppState::new(config)?;

    let app = routes::create_router(state);

    tracing::info!(%addr, "timetable-server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
