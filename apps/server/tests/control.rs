mod common;

use axum::http::StatusCode;
use common::{add_presentation, spawn_app, MockPresenter};
use serde_json::json;

#[tokio::test]
async fn healthz_works() {
    let app = spawn_app(MockPresenter::default()).await;
    let (status, body) = app.get("/api/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn nothing_open_reports_null_slide_and_zero_count() {
    let app = spawn_app(MockPresenter::with_slides(5)).await;

    let (status, body) = app.get("/api/current_slide_number").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(body["slide_number"].is_null());

    let (status, body) = app.get("/api/slide_count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slide_count"], 0);
}

#[tokio::test]
async fn navigation_round_trip() {
    let app = spawn_app(MockPresenter::with_slides(3)).await;
    add_presentation(&app, "deck.key");
    let (status, _) = app
        .post("/api/open_presentation", Some(json!({ "filename": "deck.key" })))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post("/api/next_slide", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slide_number"], 2);

    let (_, body) = app.post("/api/goto_slide/3", None).await;
    assert_eq!(body["slide_number"], 3);
    assert_eq!(body["message"], "Moved to slide 3.");

    let (_, body) = app.post("/api/next_slide", None).await;
    assert_eq!(body["slide_number"], 3);

    let (_, body) = app.post("/api/previous_slide", None).await;
    assert_eq!(body["slide_number"], 2);

    let (_, body) = app.get("/api/current_slide_number").await;
    assert_eq!(body["slide_number"], 2);
}

#[tokio::test]
async fn goto_rejects_bad_slide_numbers() {
    let app = spawn_app(MockPresenter::with_slides(3)).await;
    add_presentation(&app, "deck.key");
    app.post("/api/open_presentation", Some(json!({ "filename": "deck.key" })))
        .await;

    let (status, body) = app.post("/api/goto_slide/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, _) = app.post("/api/goto_slide/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/api/goto_slide/9", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to move to slide 9."));
}

#[tokio::test]
async fn start_without_document_is_a_script_failure() {
    let app = spawn_app(MockPresenter::with_slides(3)).await;
    let (status, body) = app.post("/api/start_presentation", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Is Keynote open with a presentation loaded?"));
}

#[tokio::test]
async fn stop_and_close_succeed_when_idle() {
    let app = spawn_app(MockPresenter::default()).await;

    let (status, body) = app.post("/api/stop_presentation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (status, body) = app.post("/api/close_presentation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn missing_scripting_host_is_not_implemented() {
    let presenter = MockPresenter::default();
    presenter.state.lock().unwrap().unavailable = true;
    let app = spawn_app(presenter).await;

    for uri in ["/api/start_presentation", "/api/stop_presentation", "/api/next_slide"] {
        let (status, body) = app.post(uri, None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "{uri}");
        assert_eq!(body["message"], "This feature is only available on macOS.");
    }
}

#[tokio::test]
async fn close_exports_timings_and_clears_current() {
    let app = spawn_app(MockPresenter::with_slides(2)).await;
    add_presentation(&app, "talks/deck.key");
    app.post(
        "/api/open_presentation",
        Some(json!({ "filename": "talks/deck.key" })),
    )
    .await;
    app.post("/api/start_presentation", None).await;

    let (status, _) = app.post("/api/close_presentation", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.presenter.state.lock().unwrap().document.is_none());

    let exports: Vec<_> = std::fs::read_dir(&app.config.elapsed_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(exports.len(), 1);
    assert!(exports[0].starts_with("deck_elapsed_"));

    let (_, doc) = app.get("/static/slide_timings.json").await;
    assert!(doc["current_presentation_id"].is_null());
    assert_eq!(
        doc["presentations"]["talks/deck.key"]["slides"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}
