use std::sync::Arc;

use super::extract::ApiJson;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    path: String,
}

#[utoipa::path(get, path = "/api/list_presentations", params(("path" = Option<String>, Query, description = "Directory relative to the library root")), responses((status = 200, description = "Directories and presentations"), (status = 403, description = "Outside the library root"), (status = 404, description = "No such directory")))]
pub async fn list_presentations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Value>> {
    let library = state.library.clone();
    let listing = task::spawn_blocking(move || library.list(&query.path))
        .await
        .map_err(|e| ApiError::Internal(format!("Listing task failed: {e}")))??;
    Ok(Json(json!({
        "status": "success",
        "path": listing.path,
        "items": listing.items,
    })))
}

#[derive(Deserialize)]
pub struct OpenPresentationBody {
    #[serde(default)]
    filename: Option<String>,
}

#[utoipa::path(post, path = "/api/open_presentation", responses((status = 200, description = "Opened and registered in the timings document"), (status = 400, description = "Bad filename"), (status = 404, description = "No such file"), (status = 501, description = "No scripting host")))]
pub async fn open_presentation(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<OpenPresentationBody>,
) -> ApiResult<Json<Value>> {
    let filename = body.filename.unwrap_or_default().trim().to_string();

    let library = state.library.clone();
    let requested = filename.clone();
    let path = task::spawn_blocking(move || library.resolve(&requested))
        .await
        .map_err(|e| ApiError::Internal(format!("Resolve task failed: {e}")))??;

    let context = "Failed to open or get info from presentation. Is Keynote installed?";
    state
        .presenter
        .open(&path)
        .await
        .map_err(ApiError::presenter(context))?;
    let slide_count = state
        .presenter
        .slide_count()
        .await
        .map_err(ApiError::presenter(context))?;
    state
        .timings_service
        .register_opened(&filename, slide_count)
        .await?;

    let current_slide_number = match state.presenter.current_slide().await {
        Ok(Some(n)) => n,
        Ok(None) => 1,
        Err(err) => {
            tracing::warn!("Could not read the current slide after opening: {}", err);
            1
        }
    };
    tracing::info!("Opened '{}' with {} slides", filename, slide_count);

    Ok(Json(json!({
        "status": "success",
        "message": format!("Presentation '{filename}' opened and configured successfully."),
        "current_slide_number": current_slide_number,
    })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list_presentations", get(list_presentations))
        .route("/open_presentation", post(open_presentation))
}
