use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Initialization error: {0}")]
    Init(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    TransportMessage(String),

    /// The gate was shut down before or while the caller waited for a permit.
    #[error("Rate gate is closed")]
    GateClosed,
}

pub type Result<T> = std::result::Result<T, SubmitError>;
