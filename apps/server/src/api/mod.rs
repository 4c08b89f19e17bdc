use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{config::Config, main_lib::AppState};
use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Json, Router,
};
use futures_core::stream::Stream;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod control;
mod extract;
mod library;
mod timings;

#[utoipa::path(get, path = "/api/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => {
            let sse_event = SseEvent::default().event(evt.name);
            let sse_event = if let Some(payload) = evt.payload {
                match sse_event.json_data(payload) {
                    Ok(ev) => ev,
                    Err(err) => {
                        tracing::error!(
                            "Failed to serialize SSE payload for {}: {}",
                            evt.name,
                            err
                        );
                        return None;
                    }
                }
            } else {
                sse_event.data("null")
            };
            Some(Ok(sse_event))
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!("Event stream lagged, {} event(s) dropped", skipped);
            None
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        control::start_presentation,
        control::stop_presentation,
        control::close_presentation,
        control::goto_slide,
        control::next_slide,
        control::previous_slide,
        control::current_slide_number,
        control::slide_count,
        library::list_presentations,
        library::open_presentation,
        timings::timings_document,
        timings::save_timings,
        timings::save_elapsed_time,
        timings::update_slide_timing,
        timings::timing_status,
    ),
    tags((name = "keymote"))
)]
pub struct ApiDoc;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/events/stream", get(stream_events))
        .merge(control::router())
        .merge(library::router())
        .merge(timings::router());

    Router::new()
        .nest("/api", api)
        .route("/static/slide_timings.json", get(timings::timings_document))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

/// Static assets under `/static`, `index.html` for everything else.
pub fn static_service(config: &Config) -> Router {
    let index_file = config.static_dir.join("index.html");
    Router::new()
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .fallback_service(ServeDir::new(&config.static_dir).fallback(ServeFile::new(index_file)))
}
