//! Server error types.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the daemon runtime.
///
/// Only configuration and bind failures are fatal; display and store
/// failures are logged at their call sites and never propagate into the
/// ingestion loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The radar ingestion socket could not be bound.
    #[error("failed to bind radar socket {addr}: {source}")]
    Bind {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// The configuration file could not be read or written.
    #[error("cannot access config {path}: {source}")]
    ConfigIo {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected schema.
    #[error("cannot parse config {path}: {source}")]
    ConfigParse {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// A display send did not complete within the timeout.
    #[error("display send to {addr} timed out")]
    DisplayTimeout {
        /// Display endpoint address.
        addr: SocketAddr,
    },

    /// A display connection or write failed.
    #[error("display send to {addr} failed: {source}")]
    DisplaySend {
        /// Display endpoint address.
        addr: SocketAddr,
        /// Underlying socket error.
        source: std::io::Error,
    },

    /// The snapshot artifact could not be written.
    #[error("snapshot write to {path} failed: {reason}")]
    Snapshot {
        /// Snapshot file path.
        path: PathBuf,
        /// Serialization or filesystem failure description.
        reason: String,
    },

    /// Terminal I/O failed in the manual injection loop.
    #[error("manual input failed: {source}")]
    Stdio {
        /// Underlying terminal error.
        #[from]
        source: std::io::Error,
    },
}
