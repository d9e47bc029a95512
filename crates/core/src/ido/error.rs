use reqwest::StatusCode;

/// Failure to obtain a record collection from the IDO service.
///
/// `Request`, `Status` and `Rejected` are transport-level failures; `Shape` means
/// the service answered but not with an `Items` array.
#[derive(Debug, thiserror::Error)]
pub enum IdoError {
    #[error("IDO request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IDO responded HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("IDO rejected the request: {0}")]
    Rejected(String),

    #[error("IDO response is malformed: {0}")]
    Shape(String),
}

impl IdoError {
    pub fn is_shape(&self) -> bool {
        matches!(self, IdoError::Shape(_))
    }
}
