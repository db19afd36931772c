//! Error taxonomy for the portal's core operations.

use thiserror::Error;

/// Errors raised by credential exchange, retrieval and export.
///
/// Every variant is recovered by the component that raised it; none of them
/// end the browser session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum PortalError {
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    #[error("no session token present")]
    AuthorizationMissing,

    #[error("retrieval failed: {0}")]
    RetrievalFailure(String),

    #[error("nothing to export")]
    ExportPrecondition,

    #[error("export failed: {0}")]
    ExportFailure(String),
}

impl PortalError {
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::AuthenticationFailure(message) | Self::RetrievalFailure(message) => message,
            Self::AuthorizationMissing => "Please sign in to continue.",
            Self::ExportPrecondition => "No data to export!",
            Self::ExportFailure(_) => "Export failed. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
