use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Please open a presentation first.")]
    NoPresentation,

    #[error(transparent)]
    Core(#[from] keymote_core::Error),
}

impl RemoteError {
    /// The message a front end should show.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
