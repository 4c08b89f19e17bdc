#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use keymote_core::errors::{PresenterError, Result};
use keymote_core::presenter::{PresenterStatus, PresenterTrait};
use keymote_remote::{RemoteClient, RemoteConfig};
use keymote_server::{api::app_router, build_state_with_presenter, config::Config, AppState};
use tempfile::{tempdir, TempDir};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct MockState {
    pub document: Option<String>,
    pub slide: u32,
    pub slide_count: u32,
    pub playing: bool,
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

    fn open_guard(&self) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let state = self.state.lock().unwrap();
        if state.document.is_none() {
            return Err(PresenterError::ScriptFailed("No presentation open.".into()).into());
        }
        Ok(state)
    }
}

#[async_trait]
impl PresenterTrait for MockPresenter {
    async fn status(&self) -> Result<PresenterStatus> {
        let state = self.state.lock().unwrap();
        Ok(match &state.document {
            Some(name) => PresenterStatus::open(name.clone(), state.slide, state.playing),
            None => PresenterStatus::closed(),
        })
    }

    async fn open(&self, path: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.document = path.file_name().map(|n| n.to_string_lossy().into_owned());
        state.slide = 1;
        Ok(())
    }

    async fn slide_count(&self) -> Result<u32> {
        let state = self.state.lock().unwrap();
        Ok(if state.document.is_some() { state.slide_count } else { 0 })
    }

    async fn current_slide(&self) -> Result<Option<u32>> {
        let state = self.state.lock().unwrap();
        Ok(state.document.as_ref().map(|_| state.slide))
    }

    async fn start(&self) -> Result<()> {
        self.open_guard()?.playing = true;
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.state.lock().unwrap().playing = false;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
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

/// A real server on an ephemeral port plus a client pointed at it.
pub struct TestServer {
    pub static_dir: TempDir,
    pub library_dir: TempDir,
    pub config: Config,
    pub state: Arc<AppState>,
    pub presenter: Arc<MockPresenter>,
    pub client: RemoteClient,
    server: JoinHandle<()>,
}

impl TestServer {
    /// Puts a `.key` file (any bytes) at `relative` under the library root.
    pub fn add_presentation(&self, relative: &str) {
        let path = self.library_dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"keynote").unwrap();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub async fn spawn_server(presenter: MockPresenter) -> TestServer {
    let static_dir = tempdir().unwrap();
    let library_dir = tempdir().unwrap();
    let config = Config::for_static_dir(static_dir.path(), library_dir.path());
    let presenter = Arc::new(presenter);
    let state = build_state_with_presenter(&config, presenter.clone())
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app_router(state.clone(), &config);
    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = RemoteClient::new(&RemoteConfig::new(format!("http://{addr}/"))).unwrap();
    TestServer {
        static_dir,
        library_dir,
        config,
        state,
        presenter,
        client,
        server,
    }
}
