/// Shared error type used across all chorus crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no API key configured for model: {model_id}")]
    NotConfigured { model_id: String },

    #[error("{provider} API error: {status} {status_text} - {body}")]
    Upstream {
        provider: String,
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("HTTP: {0}")]
    Transport(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(String),
}

impl Error {
    /// Upstream HTTP status, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_))
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, Error::NotConfigured { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
