use std::sync::Arc;

use super::extract::ApiPath;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

#[utoipa::path(post, path = "/api/start_presentation", responses((status = 200, description = "Slideshow started")))]
pub async fn start_presentation(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    state.presenter.start().await.map_err(ApiError::presenter(
        "Failed to start presentation. Is Keynote open with a presentation loaded?",
    ))?;
    Ok(Json(json!({
        "status": "success",
        "message": "Presentation started successfully.",
    })))
}

#[utoipa::path(post, path = "/api/stop_presentation", responses((status = 200, description = "Slideshow stopped, or none was running")))]
pub async fn stop_presentation(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    state.presenter.stop().await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Presentation stopped successfully.",
    })))
}

#[utoipa::path(post, path = "/api/close_presentation", responses((status = 200, description = "Timings exported and document closed")))]
pub async fn close_presentation(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    if let Some(path) = state.timings_service.close_current().await? {
        tracing::info!("Elapsed times exported to {}", path.display());
    }
    state.presenter.close().await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Presentation closed successfully.",
    })))
}

#[utoipa::path(post, path = "/api/goto_slide/{slide_number}", params(("slide_number" = u32, Path, description = "1-based presenter slide number")), responses((status = 200, description = "Slide shown")))]
pub async fn goto_slide(
    State(state): State<Arc<AppState>>,
    ApiPath(slide_number): ApiPath<u32>,
) -> ApiResult<Json<Value>> {
    if slide_number == 0 {
        return Err(ApiError::BadRequest("Slide numbers start at 1.".into()));
    }
    let context = format!(
        "Failed to move to slide {slide_number}. Is a presentation open and the slide number valid?"
    );
    let current = state
        .presenter
        .goto_slide(slide_number)
        .await
        .map_err(ApiError::presenter(&context))?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Moved to slide {current}."),
        "slide_number": current,
    })))
}

#[utoipa::path(post, path = "/api/next_slide", responses((status = 200, description = "Moved forward")))]
pub async fn next_slide(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let current = state.presenter.next_slide().await.map_err(ApiError::presenter(
        "Failed to move to next slide. Is a presentation open?",
    ))?;
    Ok(Json(json!({
        "status": "success",
        "message": "Moved to next slide.",
        "slide_number": current,
    })))
}

#[utoipa::path(post, path = "/api/previous_slide", responses((status = 200, description = "Moved back")))]
pub async fn previous_slide(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let current = state.presenter.previous_slide().await.map_err(ApiError::presenter(
        "Failed to move to previous slide. Is a presentation open?",
    ))?;
    Ok(Json(json!({
        "status": "success",
        "message": "Moved to previous slide.",
        "slide_number": current,
    })))
}

#[utoipa::path(get, path = "/api/current_slide_number", responses((status = 200, description = "Current slide, null when nothing is open")))]
pub async fn current_slide_number(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let body = match state.presenter.current_slide().await? {
        Some(slide_number) => json!({ "status": "success", "slide_number": slide_number }),
        None => json!({
            "status": "success",
            "slide_number": null,
            "message": "No active presentation in Keynote.",
        }),
    };
    Ok(Json(body))
}

#[utoipa::path(get, path = "/api/slide_count", responses((status = 200, description = "Slides in the open document, 0 when nothing is open")))]
pub async fn slide_count(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let count = state.presenter.slide_count().await?;
    let body = if count == 0 {
        json!({
            "status": "success",
            "slide_count": 0,
            "message": "No active presentation in Keynote.",
        })
    } else {
        json!({ "status": "success", "slide_count": count })
    };
    Ok(Json(body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start_presentation", post(start_presentation))
        .route("/stop_presentation", post(stop_presentation))
        .route("/close_presentation", post(close_presentation))
        .route("/goto_slide/{slide_number}", post(goto_slide))
        .route("/next_slide", post(next_slide))
        .route("/previous_slide", post(previous_slide))
        .route("/current_slide_number", get(current_slide_number))
        .route("/slide_count", get(slide_count))
}
