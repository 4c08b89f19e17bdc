//! Presentation library - directory browsing and safe filename resolution.

mod library_model;
mod library_service;

pub use library_model::{LibraryItem, LibraryItemKind, Listing};
pub use library_service::PresentationLibrary;
