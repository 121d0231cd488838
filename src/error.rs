//! Error types for the overlay, the query providers and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while hosting the prompt overlay.
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("view zone event stream closed before the prompt resolved")]
    ZoneClosed,

    #[error("failed to render view zone: {0}")]
    Render(String),
}

/// Errors returned by a [`crate::search::SearchProvider`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("OpenRouter API key not found in environment variable {0}")]
    MissingApiKey(&'static str),

    #[error("API key appears to be invalid: {0}")]
    InvalidApiKey(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed with status {0}")]
    Status(u16),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("response contained no choices")]
    EmptyReply,
}

/// Errors raised while loading [`crate::overlay::config::OverlayConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
