//! Request configuration and validation.

use mailfetch_imap::Selector;

use crate::{Error, Result};

/// Folder selected when none is given.
pub const DEFAULT_FOLDER: &str = "INBOX";

/// What to do once the folder is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Write one raw message to the sink.
    Retrieve,
    /// Print From, To, Date and Subject of one message.
    Parse,
    /// Print the `text/plain` part of a `multipart/alternative` message.
    Mime,
    /// Print `<sequence>: <subject>` for every message.
    List,
}

impl Operation {
    /// Returns the command name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Retrieve => "retrieve",
            Self::Parse => "parse",
            Self::Mime => "mime",
            Self::List => "list",
        }
    }
}

/// Everything one run needs besides the transport.
#[derive(Clone)]
pub struct Request {
    /// Operation to run.
    pub operation: Operation,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Folder to select, [`DEFAULT_FOLDER`] when `None`.
    pub folder: Option<String>,
    /// Message selector as given by the user (`*` or a number).
    pub message: Option<String>,
}

impl Request {
    /// Returns the folder to select.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.folder.as_deref().unwrap_or(DEFAULT_FOLDER)
    }

    /// Checks the request and returns the selector the FETCH will use.
    ///
    /// Runs before any I/O. `list` always fetches every message and ignores
    /// the message selector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for missing credentials, an explicitly empty
    /// folder, or a message selector other than `*` or a positive number.
    pub fn validate(&self) -> Result<Selector> {
        if self.username.is_empty() {
            return Err(Error::Config("Username not specified".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("Password not specified".to_string()));
        }
        if self.folder.as_deref().is_some_and(str::is_empty) {
            return Err(Error::Config("specified folder is empty".to_string()));
        }

        match self.operation {
            Operation::List => Ok(Selector::All),
            Operation::Retrieve | Operation::Parse | Operation::Mime => {
                Selector::parse(self.message.as_deref()).map_err(|err| match err {
                    mailfetch_imap::Error::Config(message) => Error::Config(message),
                    other => Error::Imap(other),
                })
            }
        }
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("operation", &self.operation)
            .field("username", &self.username)
            .field("folder", &self.folder)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}
