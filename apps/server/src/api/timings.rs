use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    routing::{get, post, put},
    Json, Router,
};
use keymote_core::timings::TimingsDocument;
use serde::Deserialize;
use serde_json::{json, Value};

/// The live timings document, as the remotes fetch it on load.
#[utoipa::path(get, path = "/static/slide_timings.json", responses((status = 200, description = "The timings document")))]
pub async fn timings_document(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TimingsDocument>> {
    Ok(Json(state.timings_service.get_document().await?))
}

#[utoipa::path(post, path = "/api/save_timings", responses((status = 200, description = "Document replaced"), (status = 400, description = "Malformed document")))]
pub async fn save_timings(
    State(state): State<Arc<AppState>>,
    ApiJson(document): ApiJson<TimingsDocument>,
) -> ApiResult<Json<Value>> {
    state.timings_service.replace_document(document).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Timings saved successfully.",
    })))
}

#[derive(Deserialize)]
pub struct ElapsedBody {
    elapsed_seconds: u64,
}

#[utoipa::path(post, path = "/api/save_elapsed_time", responses((status = 200, description = "Elapsed time stored on the current presentation")))]
pub async fn save_elapsed_time(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ElapsedBody>,
) -> ApiResult<Json<Value>> {
    state
        .timings_service
        .record_elapsed(body.elapsed_seconds)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Elapsed time saved successfully.",
        "elapsed_seconds": body.elapsed_seconds,
    })))
}

#[derive(Deserialize)]
pub struct EstimateBody {
    estimated_time_seconds: u64,
}

#[utoipa::path(put, path = "/api/slide_timings/{index}", params(("index" = usize, Path, description = "Timeline index, breaks included")), responses((status = 200, description = "Planned time updated"), (status = 400, description = "No presentation or index out of range")))]
pub async fn update_slide_timing(
    State(state): State<Arc<AppState>>,
    ApiPath(index): ApiPath<usize>,
    ApiJson(body): ApiJson<EstimateBody>,
) -> ApiResult<Json<Value>> {
    let document = state
        .timings_service
        .update_estimate(index, body.estimated_time_seconds)
        .await?;
    Ok(Json(json!({
        "status": "success",
        "message": format!("Slide timing {index} updated."),
        "presentation": document.current(),
    })))
}

#[derive(Deserialize)]
pub struct TimingStatusQuery {
    slide_number: Option<u32>,
}

#[utoipa::path(get, path = "/api/timing_status", params(("slide_number" = Option<u32>, Query, description = "Defaults to the presenter's current slide")), responses((status = 200, description = "Schedule and slide status")))]
pub async fn timing_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimingStatusQuery>,
) -> ApiResult<Json<Value>> {
    let slide_number = match query.slide_number {
        Some(n) => Some(n),
        None => state.presenter.current_slide().await?,
    };
    let Some(slide_number) = slide_number else {
        return Ok(Json(json!({
            "status": "success",
            "slide_number": null,
            "schedule": null,
            "slide": null,
            "message": "No active presentation in Keynote.",
        })));
    };

    let schedule = state.timings_service.schedule_status(slide_number).await?;
    let slide = state.timings_service.slide_status(slide_number).await?;
    Ok(Json(json!({
        "status": "success",
        "slide_number": slide_number,
        "schedule": schedule,
        "slide": slide,
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/save_timings", post(save_timings))
        .route("/save_elapsed_time", post(save_elapsed_time))
        .route("/slide_timings/{index}", put(update_slide_timing))
        .route("/timing_status", get(timing_status))
}
