/// Error taxonomy shared by every backend adapter.
///
/// Adapters never retry: a transport failure, non-2xx status, or parse
/// failure is surfaced once to the caller, which decides whether to fall
/// back to another source.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("http {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AdapterError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdapterError::HttpStatus { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
