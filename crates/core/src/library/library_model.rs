use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryItemKind {
    Directory,
    File,
}

/// One visible entry of a browsed directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LibraryItemKind,
    /// Root-relative path with `/` separators.
    pub path: String,
}

/// A directory listing relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Root-relative directory path; empty at the root.
    pub path: String,
    pub items: Vec<LibraryItem>,
}
