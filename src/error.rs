use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DarkMatterError>;

#[derive(Debug, Error)]
pub enum DarkMatterError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to load error page template: {0}")]
    Template(#[from] tera::Error),

    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

impl DarkMatterError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
