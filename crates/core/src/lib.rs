//! Keymote Core - slide timings, presentation library and presenter control.
//!
//! This crate holds the domain logic shared by the HTTP server and the remote
//! client. It is transport-agnostic: the server and the client translate its
//! errors into status codes or user-facing messages.

pub mod constants;
pub mod errors;
pub mod library;
pub mod presenter;
pub mod session;
pub mod timings;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
