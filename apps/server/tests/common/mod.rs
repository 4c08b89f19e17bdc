#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use keymote_core::errors::{PresenterError, Result};
use keymote_core::presenter::{PresenterStatus, PresenterTrait};
use keymote_server::{api::app_router, build_state_with_presenter, config::Config, AppState};
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

#[derive(Debug, Default)]
pub struct MockState {
    pub document: Option<String>,
    pub slide: u32,
    pub slide_count: u32,
    pub playing: bool,
    pub unavailable: bool,
    pub fail_scripts: bool,
}

/// In-memory stand-in for Keynote.
#[derive(Debug, Default)]
pub struct MockPresenter {
    pub state: Mutex<MockState>,
}

impl MockPresenter {
    pub fn with_slides(slide_count: u32) -> Self {
        Self {
            state: Mutex::new(MockState {
                slide_count,
                ..Default::default()
            }),
        }
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(PresenterError::Unavailable.into());
        }
        if state.fail_scripts {
            return Err(PresenterError::ScriptFailed("Keynote got an error".into()).into());
        }
        Ok(state)
    }

    fn open_guard(&self) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let state = self.guard()?;
        if state.document.is_none() {
            return Err(PresenterError::ScriptFailed("No presentation open.".into()).into());
        }
        Ok(state)
    }
}

#[async_trait]
impl PresenterTrait for MockPresenter {
    async fn status(&self) -> Result<PresenterStatus> {
        let state = self.guard()?;
        Ok(match &state.document {
            Some(name) => PresenterStatus::open(name.clone(), state.slide, state.playing),
            None => PresenterStatus::closed(),
        })
    }

    async fn open(&self, path: &Path) -> Result<()> {
        let mut state = self.guard()?;
        state.document = path.file_name().map(|n| n.to_string_lossy().into_owned());
        state.slide = 1;
        Ok(())
    }

    async fn slide_count(&self) -> Result<u32> {
        let state = self.guard()?;
        Ok(if state.document.is_some() {
            state.slide_count
        } else {
            0
        })
    }

    async fn current_slide(&self) -> Result<Option<u32>> {
        let state = self.guard()?;
        Ok(state.document.as_ref().map(|_| state.slide))
    }

    async fn start(&self) -> Result<()> {
        let mut state = self.open_guard()?;
        state.playing = true;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(PresenterError::Unavailable.into());
        }
        state.playing = false;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.unavailable {
            return Err(PresenterError::Unavailable.into());
        }
        state.document = None;
        state.playing = false;
        Ok(())
    }

    async fn next_slide(&self) -> Result<u32> {
        let mut state = self.open_guard()?;
        if state.slide < state.slide_count {
            state.slide += 1;
        }
        Ok(state.slide)
    }

    async fn previous_slide(&self) -> Result<u32> {
        let mut state = self.open_guard()?;
        if state.slide > 1 {
            state.slide -= 1;
        }
        Ok(state.slide)
    }

    async fn goto_slide(&self, slide_number: u32) -> Result<u32> {
        let mut state = self.open_guard()?;
        if slide_number > state.slide_count {
            return Err(PresenterError::ScriptFailed("Invalid index.".into()).into());
        }
        state.slide = slide_number;
        Ok(state.slide)
    }
}

pub struct TestApp {
    pub static_dir: TempDir,
    pub library_dir: TempDir,
    pub config: Config,
    pub state: Arc<AppState>,
    pub presenter: Arc<MockPresenter>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        app_router(self.state.clone(), &self.config)
    }

    /// Sends one request through a fresh router and decodes the JSON reply.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send(Method::POST, uri, body).await
    }
}

pub async fn spawn_app(presenter: MockPresenter) -> TestApp {
    let static_dir = tempdir().unwrap();
    let library_dir = tempdir().unwrap();
    let config = Config::for_static_dir(static_dir.path(), library_dir.path());
    let presenter = Arc::new(presenter);
    let state = build_state_with_presenter(&config, presenter.clone())
        .await
        .unwrap();
    TestApp {
        static_dir,
        library_dir,
        config,
        state,
        presenter,
    }
}

/// Puts a `.key` file (any bytes) at `relative` under the library root.
pub fn add_presentation(app: &TestApp, relative: &str) {
    let path = app.library_dir.path().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, b"keynote").unwrap();
}
