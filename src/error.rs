use thiserror::Error;

#[derive(Error, Debug)]
pub enum MisionalError {
    #[error("no ward matches the given passphrase")]
    AuthenticationFailed,

    #[error("ward not found: {0}")]
    WardNotFound(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, MisionalError>;
