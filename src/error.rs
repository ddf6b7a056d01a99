//! Error types for qrmint.

use thiserror::Error;

/// Errors produced by the code generator core.
///
/// The `Display` output of every variant is the bare message, so transports
/// can surface it verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The request was rejected before any image work (empty text, bad size,
    /// unsupported character, data too long).
    #[error("{0}")]
    Validation(String),

    /// The icon bytes are not a decodable raster image.
    #[error("{0}")]
    Decode(String),

    /// Serializing the output image failed.
    #[error("{0}")]
    Encode(String),
}

impl CodeError {
    /// Whether the error was caused by the caller's input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Decode(_))
    }
}

/// Errors raised by the CLI and HTTP adapters around the core.
#[derive(Debug, Error)]
pub enum AppError {
    /// The generator rejected the request or failed.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// A transport-level argument was invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// An icon could not be fetched from its URL.
    #[error("icon fetch failed: {0}")]
    IconFetch(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// The HTTP server failed to start or stopped unexpectedly.
    #[error("Server error: {0}")]
    Server(String),
}

impl AppError {
    /// Whether the error should be reported to an HTTP client as a bad request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Code(e) => e.is_client_error(),
            Self::InvalidArgument(_) | Self::IconFetch(_) | Self::Network(_) => true,
            Self::Io(_) | Self::Config(_) | Self::Server(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_error_displays_bare_message() {
        let err = CodeError::Validation("text is required".into());
        assert_eq!(err.to_string(), "text is required");
    }

    #[test]
    fn client_error_classification() {
        assert!(CodeError::Validation("x".into()).is_client_error());
        assert!(CodeError::Decode("x".into()).is_client_error());
        assert!(!CodeError::Encode("x".into()).is_client_error());

        assert!(AppError::from(CodeError::Decode("x".into())).is_client_error());
        assert!(AppError::IconFetch("timeout".into()).is_client_error());
        assert!(!AppError::from(CodeError::Encode("x".into())).is_client_error());
        assert!(!AppError::Config("bad".into()).is_client_error());
    }

    #[test]
    fn app_error_passes_code_message_through() {
        let err = AppError::from(CodeError::Validation("size out of range (64-2048)".into()));
        assert_eq!(err.to_string(), "size out of range (64-2048)");
    }
}
