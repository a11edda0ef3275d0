//! Error types for the core library.

use thiserror::Error;

use crate::session::SessionState;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Connecting to the server failed.
    #[error("Connection failed: {0}")]
    Connection(#[source] mailfetch_imap::Error),

    /// IMAP operation failed.
    #[error("IMAP error: {0}")]
    Imap(#[from] mailfetch_imap::Error),

    /// Message content could not be interpreted.
    #[error("MIME error: {0}")]
    Mime(#[from] mailfetch_mime::Error),

    /// Writing to the output sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request, detected before any I/O.
    #[error("Configuration error: {0}")]
    Config(String),

    /// FETCH completed without returning a message.
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Session operation attempted in the wrong state.
    #[error("Invalid state: {operation} requires {expected:?}, session is {actual:?}")]
    InvalidState {
        /// The attempted operation.
        operation: &'static str,
        /// State the operation requires.
        expected: SessionState,
        /// State the session was in.
        actual: SessionState,
    },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure categories, one per exit status family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad arguments.
    Config,
    /// Resolution, TCP connect or TLS handshake failed.
    Connection,
    /// Protocol violation or transport failure mid-session.
    Protocol,
    /// MIME content could not be interpreted.
    Content,
    /// Output sink failure.
    Io,
    /// LOGIN rejected.
    LoginFailed,
    /// SELECT rejected.
    FolderNotFound,
    /// FETCH returned no literal.
    MessageNotFound,
    /// Operation called out of order.
    InvalidState,
}

impl ErrorKind {
    /// Process exit status for this kind.
    ///
    /// The IMAP-level outcomes share status 3.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Config => 1,
            Self::Connection => 2,
            Self::Protocol | Self::LoginFailed | Self::FolderNotFound | Self::MessageNotFound => 3,
            Self::Content => 4,
            Self::Io | Self::InvalidState => 5,
        }
    }
}

impl Error {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) => ErrorKind::Connection,
            Self::Imap(err) => match err {
                mailfetch_imap::Error::Config(_) => ErrorKind::Config,
                mailfetch_imap::Error::LoginFailed(_) => ErrorKind::LoginFailed,
                mailfetch_imap::Error::FolderNotFound(_) => ErrorKind::FolderNotFound,
                mailfetch_imap::Error::InvalidState(_) => ErrorKind::InvalidState,
                _ => ErrorKind::Protocol,
            },
            Self::Mime(_) => ErrorKind::Content,
            Self::Io(_) => ErrorKind::Io,
            Self::Config(_) => ErrorKind::Config,
            Self::MessageNotFound(_) => ErrorKind::MessageNotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// The one-line message shown to the user on stdout.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Imap(mailfetch_imap::Error::LoginFailed(_)) => "Login failure".to_string(),
            Self::Imap(mailfetch_imap::Error::FolderNotFound(_)) => "Folder not found".to_string(),
            Self::MessageNotFound(_) => "Message not found".to_string(),
            Self::Imap(mailfetch_imap::Error::Config(message)) | Self::Config(message) => {
                message.clone()
            }
            Self::Mime(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Wraps a failure of the connect step.
    #[must_use]
    pub const fn connection(err: mailfetch_imap::Error) -> Self {
        Self::Connection(err)
    }
}
