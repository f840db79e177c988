//! Error types shared by the gateway and the generation operations

use thiserror::Error;

/// Remediation text surfaced when no API key is configured
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key not configured. Set the API_KEY environment variable (or `api_key` in ~/.copywriter/config.json) and try again.";

/// Broad category of a [`CopyError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    Upstream,
    MalformedResponse,
    Generation,
}

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model service error: {0}")]
    Upstream(String),

    #[error("The model service responded in an unexpected shape: {0}")]
    MalformedResponse(String),

    #[error("{message}")]
    Generation {
        message: String,
        #[source]
        source: Box<CopyError>,
    },
}

impl CopyError {
    pub fn missing_api_key() -> Self {
        Self::Configuration(MISSING_API_KEY_MESSAGE.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Generation { .. } => ErrorKind::Generation,
        }
    }

    /// Category of the underlying failure, looking through `Generation`
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::Generation { source, .. } => source.root_kind(),
            other => other.kind(),
        }
    }

    /// Wrap a gateway failure with a user-facing message.
    ///
    /// Configuration errors pass through untouched so the remediation text
    /// reaches the operator verbatim.
    pub(crate) fn into_generation(self, message: &str) -> Self {
        match self {
            Self::Configuration(_) => self,
            other => Self::Generation {
                message: message.to_string(),
                source: Box::new(other),
            },
        }
    }
}
