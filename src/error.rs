use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Record store error: {0}")]
    Store(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event not found: {id}")]
    EventNotFound { id: String },
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;
