//! Keymote Remote - client side of the Keymote protocol.
//!
//! [`RemoteClient`] talks to a Keymote server over HTTP and follows its
//! server-sent event stream. [`Controller`] pairs a client with a
//! [`keymote_core::session::Session`] so a front end only has to render.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
mod sse;

pub use client::{RemoteClient, TimingStatus};
pub use config::RemoteConfig;
pub use controller::Controller;
pub use error::{RemoteError, Result};
