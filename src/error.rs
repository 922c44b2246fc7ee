use thiserror::Error;

/// Why a piece of text could not be read as a color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
    #[error("text does not match {notation} notation: {text}")]
    NoMatch { notation: &'static str, text: String },
    #[error("component out of range: {0}")]
    OutOfRange(String),
    #[error("unrecognized color notation: {0}")]
    Unrecognized(String),
}

/// Errors from palette persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
