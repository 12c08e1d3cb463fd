use chrono::Local;
use chunk_tracker::{
    AppState, Config, KvStore, handlers::open_session, load_data, router,
    suggestions::SuggestionClient,
};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let suggestions = SuggestionClient::new(config.suggestions.clone());
    if !suggestions.is_configured() {
        warn!("GEMINI_API_KEY not set; task suggestions are disabled");
    }

    let store = KvStore::new(config.data_path.clone());
    let data = load_data(&store).await;
    let state = AppState::new(store, data, suggestions);

    open_session(&state, Local::now().date_naive())
        .await
        .map_err(|err| format!("failed to start session: {}", err.message))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
