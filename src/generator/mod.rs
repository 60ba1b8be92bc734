//! Text generation backends.
//!
//! A [`TextGenerator`] turns a prompt into raw text. The quiz only ever makes
//! one call per fetch and treats the backend as opaque.

mod file;
mod gemini;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileGenerator;
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig, GeminiGenerator};

/// Errors raised by a text generation backend.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single opaque call to a text generation provider.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerateError>;
}
