use thiserror::Error;

/// Failures surfaced by the portal.
///
/// Store operations never fail; role parsing, the chat transport and the
/// console's own I/O do.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Invalid role: {0}. Must be one of: IT, OPS, FINANCE, CSM")]
    UnknownRole(String),

    #[error("Message is required")]
    EmptyMessage,

    #[error("chat transport failed: {0}")]
    Transport(String),

    #[error("chat backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid chat response: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PortalError {
    fn from(err: serde_json::Error) -> Self {
        PortalError::Decode(err.to_string())
    }
}
