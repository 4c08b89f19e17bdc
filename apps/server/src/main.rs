mod api;
mod config;
mod error;
mod events;
mod main_lib;
mod monitor;

use api::{app_router, static_service};
use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    // Watch the presentation application and push changes to remotes
    monitor::start_presenter_monitor(state.clone(), config.poll_interval);

    let router = app_router(state, &config).fallback_service(static_service(&config));
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
