use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaySyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid feed body from {url}: {reason}")]
    InvalidFeed { url: String, reason: String },

    #[error("Property not found: {id}")]
    PropertyNotFound { id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, StaySyncError>;
