//! Error types for tag parsing and rendering

use thiserror::Error;

/// Result type alias for tag operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or rendering an STW tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required site-wide setting is missing (e.g. `stwaccesskeyid`)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The tag was used incorrectly in a template
    #[error("Template syntax error: {0}")]
    SyntaxError(String),

    /// A variable reference could not be looked up in the render context
    #[error("Failed to resolve variable: {0}")]
    ContextResolutionError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the host template engine should treat this as a template
    /// syntax error. Configuration errors abort compilation the same way.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::SyntaxError(_) | Error::ConfigError(_))
    }
}
