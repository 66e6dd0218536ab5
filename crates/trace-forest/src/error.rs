use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The value cannot be ordered (e.g. NaN) and was rejected before the
    /// tree was touched.
    #[error("INVALID_VALUE: {0}")]
    InvalidValue(String),
    #[error("INVALID_JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Json(err.to_string())
    }
}
