//! Error types for the IMAP client.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between connecting and LOGOUT.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure, including a literal cut short by end of stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host is not usable as a TLS server name.
    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// The host did not resolve to any address.
    #[error("Could not resolve host: {0}")]
    Resolve(String),

    /// The connect step did not finish in time.
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// A literal marker or FETCH sequence number was malformed.
    #[error("Framing error: {0}")]
    Framing(String),

    /// A command did not fit the command buffer.
    #[error("Command too long: {length} bytes (max {max})")]
    Format {
        /// Rendered length of the command.
        length: usize,
        /// Capacity of the command buffer.
        max: usize,
    },

    /// A user-supplied argument was rejected before any I/O.
    #[error("Invalid argument: {0}")]
    Config(String),

    /// The server rejected LOGIN.
    #[error("Login failure: {0}")]
    LoginFailed(String),

    /// The server rejected SELECT.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// A reply was read with no command outstanding.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The server broke the protocol: `* BYE` greeting, non-OK completion,
    /// oversized literal or a stream that ended mid-reply.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result alias for the IMAP client.
pub type Result<T> = std::result::Result<T, Error>;
