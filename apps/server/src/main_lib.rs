use std::sync::Arc;

use crate::{config::Config, events::EventBus};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use keymote_core::{
    library::PresentationLibrary,
    presenter::{KeynotePresenter, PresenterTrait},
    timings::{JsonTimingsRepository, TimingsService, TimingsServiceTrait},
};

pub struct AppState {
    pub presenter: Arc<dyn PresenterTrait>,
    pub timings_service: Arc<dyn TimingsServiceTrait>,
    pub library: Arc<PresentationLibrary>,
    pub event_bus: EventBus,
}

pub fn init_tracing() {
    let fmt_layer = fmt::layer().json().with_current_span(false);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_presenter(config, Arc::new(KeynotePresenter::new())).await
}

/// Builds the state around an arbitrary presenter driver.
pub async fn build_state_with_presenter(
    config: &Config,
    presenter: Arc<dyn PresenterTrait>,
) -> anyhow::Result<Arc<AppState>> {
    tokio::fs::create_dir_all(&config.elapsed_dir).await?;
    tracing::info!("Timings document in use: {}", config.timings_path.display());
    tracing::info!("Presentation library root: {}", config.library_root.display());

    let repository = Arc::new(JsonTimingsRepository::new(
        config.timings_path.clone(),
        config.elapsed_dir.clone(),
    ));
    let timings_service: Arc<dyn TimingsServiceTrait> = Arc::new(TimingsService::new(repository));
    // A corrupt document fails the boot.
    let document = timings_service.get_document().await?;
    tracing::info!(
        "Loaded {} presentation(s), current: {:?}",
        document.presentations.len(),
        document.current_presentation_id
    );

    Ok(Arc::new(AppState {
        presenter,
        timings_service,
        library: Arc::new(PresentationLibrary::new(&config.library_root)),
        event_bus: EventBus::new(256),
    }))
}
