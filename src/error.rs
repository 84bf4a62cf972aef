//! Error types for craftgate
//!
//! Provides a unified, classified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using GateError
pub type Result<T> = std::result::Result<T, GateError>;

/// Unified error type for craftgate operations
#[derive(Debug, Error)]
pub enum GateError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connectivity Errors
    // -------------------------------------------------------------------------
    #[error("Server unreachable at {addr}: {source}")]
    Unreachable {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    // -------------------------------------------------------------------------
    // Remote Console Errors
    // -------------------------------------------------------------------------
    #[error("Authentication rejected by remote console")]
    AuthenticationRejected,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    // -------------------------------------------------------------------------
    // Configuration File Errors
    // -------------------------------------------------------------------------
    #[error("Properties file not found: {}", .0.display())]
    PropertiesNotFound(PathBuf),

    #[error("Properties file {}: {source}", path.display())]
    PropertiesIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    // -------------------------------------------------------------------------
    // Mod Directory Errors
    // -------------------------------------------------------------------------
    #[error("Mod not found: {0}")]
    ModNotFound(String),

    #[error("Invalid mod name: {0:?}")]
    InvalidModName(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Classify a transport-level I/O error from an established connection.
    ///
    /// Read/write timeouts surface as `WouldBlock` on Unix and `TimedOut` on
    /// Windows; both become `Timeout`. Anything else means the connection is gone.
    pub(crate) fn from_transport(err: std::io::Error, context: &str) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => {
                GateError::Timeout(format!("{}: {}", context, err))
            }
            _ => GateError::ConnectionLost(format!("{}: {}", context, err)),
        }
    }

    /// True for failures meaning the endpoint could not be reached or dropped us
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            GateError::Unreachable { .. } | GateError::ConnectionLost(_)
        )
    }

    /// True if the remote side did not answer within the configured bound
    pub fn is_timeout(&self) -> bool {
        matches!(self, GateError::Timeout(_))
    }

    /// True if a session that produced this error is in an unknown state and
    /// must not be reused.
    pub fn discards_session(&self) -> bool {
        matches!(
            self,
            GateError::Unreachable { .. }
                | GateError::ConnectionLost(_)
                | GateError::Timeout(_)
                | GateError::AuthenticationRejected
                | GateError::Protocol(_)
                | GateError::Io(_)
        )
    }
}
