use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherscopeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty input: {0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type Result<T> = std::result::Result<T, CipherscopeError>;
