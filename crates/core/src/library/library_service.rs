//! Browsing and resolving presentation files under a fixed root directory.

use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::constants::PRESENTATION_EXTENSION;
use crate::errors::{LibraryError, Result};

use super::library_model::{LibraryItem, LibraryItemKind, Listing};

/// Folds `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn relative_display(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_presentation(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext == PRESENTATION_EXTENSION)
        .unwrap_or(false)
}

fn item_order(a: &LibraryItem, b: &LibraryItem) -> Ordering {
    let rank = |item: &LibraryItem| item.kind != LibraryItemKind::Directory;
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// The directory tree a remote may browse and open presentations from.
#[derive(Debug, Clone)]
pub struct PresentationLibrary {
    root: PathBuf,
}

impl PresentationLibrary {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root: normalize(&absolute),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `relative` onto the root, returning `None` when the result
    /// escapes it.
    fn contain(&self, relative: &str) -> Option<PathBuf> {
        let joined = normalize(&self.root.join(relative));
        joined.starts_with(&self.root).then_some(joined)
    }

    /// Lists sub-directories and presentation files of `requested`.
    ///
    /// Hidden entries are skipped; directories sort before files, each
    /// group case-insensitively by name.
    pub fn list(&self, requested: &str) -> Result<Listing> {
        let requested = if requested.trim().is_empty() {
            "."
        } else {
            requested
        };
        let current = self.contain(requested).ok_or(LibraryError::AccessDenied)?;
        let relative = current
            .strip_prefix(&self.root)
            .map(relative_display)
            .unwrap_or_default();

        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                return Err(LibraryError::NotFound("Directory not found.".into()).into())
            }
            Err(err) => return Err(err.into()),
        };

        let mut items = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                LibraryItemKind::Directory
            } else if file_type.is_file() && is_presentation(&name) {
                LibraryItemKind::File
            } else {
                continue;
            };
            let path = if relative.is_empty() {
                name.clone()
            } else {
                format!("{relative}/{name}")
            };
            items.push(LibraryItem { name, kind, path });
        }
        items.sort_by(item_order);

        debug!("Listed {} entries under '{}'", items.len(), relative);
        Ok(Listing {
            path: relative,
            items,
        })
    }

    /// Resolves a root-relative presentation filename to an existing file.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf> {
        if filename.trim().is_empty() {
            return Err(LibraryError::MissingFilename.into());
        }
        if Path::new(filename).is_absolute() {
            return Err(LibraryError::AbsolutePath.into());
        }
        let path = self.contain(filename).ok_or(LibraryError::PathTraversal)?;
        if !path.is_file() {
            return Err(LibraryError::NotFound(format!("File '{filename}' not found.")).into());
        }
        Ok(path)
    }
}
