use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        CurveError::Config(err.to_string())
    }
}

impl CurveError {
    /// Errors that come from stale or foreign handles rather than user intent.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, CurveError::NotFound(_) | CurveError::InvalidReference(_))
    }
}

pub type Result<T> = std::result::Result<T, CurveError>;
