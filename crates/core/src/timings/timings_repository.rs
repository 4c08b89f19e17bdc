//! JSON-file storage for the timings document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Local;
use log::debug;
use tokio::fs;
use tokio::sync::Mutex;

use crate::constants::EXPORT_TIMESTAMP_FORMAT;
use crate::errors::Result;

use super::timings_model::{Presentation, TimingsDocument};
use super::timings_traits::TimingsRepositoryTrait;

#[derive(Debug)]
pub struct JsonTimingsRepository {
    path: PathBuf,
    elapsed_dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonTimingsRepository {
    pub fn new(path: impl Into<PathBuf>, elapsed_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            elapsed_dir: elapsed_dir.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load_locked(&self) -> Result<TimingsDocument> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TimingsDocument::default())
            }
            Err(err) => return Err(err.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(TimingsDocument::default());
        }
        Ok(serde_json::from_slice(&raw)?)
    }

    async fn persist_locked(&self, document: &TimingsDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json).await?;
        debug!("Timings written to {}", self.path.display());
        Ok(())
    }

    /// Writes `presentation` to `{base}_elapsed_{timestamp}.json`, where the
    /// base is the presentation id without directories or extension.
    async fn export(
        &self,
        presentation_id: &str,
        presentation: &Presentation,
    ) -> Result<PathBuf> {
        let base_name = Path::new(presentation_id)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| presentation_id.to_string());
        fs::create_dir_all(&self.elapsed_dir).await?;
        let timestamp = Local::now().format(EXPORT_TIMESTAMP_FORMAT);
        let out_path = self
            .elapsed_dir
            .join(format!("{base_name}_elapsed_{timestamp}.json"));
        let json = serde_json::to_string_pretty(presentation)?;
        fs::write(&out_path, json).await?;
        Ok(out_path)
    }
}

#[async_trait]
impl TimingsRepositoryTrait for JsonTimingsRepository {
    async fn load(&self) -> Result<TimingsDocument> {
        let _guard = self.lock.lock().await;
        self.load_locked().await
    }

    async fn save(&self, document: &TimingsDocument) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.persist_locked(document).await
    }

    async fn update(
        &self,
        op: Box<dyn for<'a> FnOnce(&'a mut TimingsDocument) -> Result<()> + Send>,
    ) -> Result<TimingsDocument> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?;
        op(&mut document)?;
        self.persist_locked(&document).await?;
        Ok(document)
    }

    async fn close_current(&self) -> Result<Option<PathBuf>> {
        let _guard = self.lock.lock().await;
        let mut document = self.load_locked().await?;
        let exported = match (document.current_presentation_id.as_deref(), document.current()) {
            (Some(id), Some(presentation)) => Some(self.export(id, presentation).await?),
            _ => None,
        };
        document.current_presentation_id = None;
        self.persist_locked(&document).await?;
        Ok(exported)
    }
}
