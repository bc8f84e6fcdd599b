use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InboxError {
    /// Raised before any request is sent.
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API error: {status}{}", body_suffix(.body))]
    Api { status: StatusCode, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

pub type Result<T> = std::result::Result<T, InboxError>;
