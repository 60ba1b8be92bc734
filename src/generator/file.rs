use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{GenerateError, TextGenerator};

/// Replays a saved provider response from disk, ignoring the prompt.
#[derive(Debug, Clone)]
pub struct FileGenerator {
    path: PathBuf,
}

impl FileGenerator {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TextGenerator for FileGenerator {
    async fn generate_text(&self, _prompt: &str) -> Result<String, GenerateError> {
        tracing::debug!(path = %self.path.display(), "replaying saved response");
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| GenerateError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
