//! IMAP command builder.
//!
//! This module provides types and serialization for the commands the client
//! issues: LOGIN, SELECT, FETCH and LOGOUT.

mod serialize;
mod tag_generator;
mod types;

use bytes::BytesMut;

use crate::types::{Selector, Tag};
use crate::{Error, Result};

pub use tag_generator::TagGenerator;
pub use types::FetchItems;

use serialize::{write_fetch_items, write_quoted};

/// Capacity of the command buffer; longer commands are refused.
pub const MAX_COMMAND_LENGTH: usize = 100 * 1024;

/// IMAP command.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// SELECT command.
    Select {
        /// Mailbox to select.
        mailbox: String,
    },
    /// FETCH command.
    Fetch {
        /// Message(s) to fetch.
        selector: Selector,
        /// Items to fetch.
        items: FetchItems,
    },
    /// LOGOUT command.
    Logout,
}

impl Command {
    /// Serializes the command to bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &Tag) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(tag.as_str().as_bytes());
        buf.push(b' ');

        match self {
            Self::Login { username, password } => {
                buf.extend_from_slice(b"LOGIN ");
                write_quoted(&mut buf, username);
                buf.push(b' ');
                write_quoted(&mut buf, password);
            }
            Self::Select { mailbox } => {
                buf.extend_from_slice(b"SELECT ");
                write_quoted(&mut buf, mailbox);
            }
            Self::Fetch { selector, items } => {
                buf.extend_from_slice(format!("FETCH {selector} ").as_bytes());
                write_fetch_items(&mut buf, *items);
            }
            Self::Logout => buf.extend_from_slice(b"LOGOUT"),
        }

        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Renders the command into `buf`, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if the rendered command would not fit in
    /// [`MAX_COMMAND_LENGTH`] bytes. `buf` is left empty in that case.
    pub fn encode(&self, tag: &Tag, buf: &mut BytesMut) -> Result<()> {
        buf.clear();
        let rendered = self.serialize(tag);
        if rendered.len() > MAX_COMMAND_LENGTH {
            return Err(Error::Format {
                length: rendered.len(),
                max: MAX_COMMAND_LENGTH,
            });
        }
        buf.extend_from_slice(&rendered);
        Ok(())
    }

    /// Returns a loggable form of the command, with credentials redacted.
    #[must_use]
    pub fn redacted(&self, tag: &Tag) -> String {
        match self {
            Self::Login { .. } => format!("{tag} LOGIN <redacted>"),
            other => String::from_utf8_lossy(&other.serialize(tag))
                .trim_end()
                .to_string(),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Select { mailbox } => f.debug_struct("Select").field("mailbox", mailbox).finish(),
            Self::Fetch { selector, items } => f
                .debug_struct("Fetch")
                .field("selector", selector)
                .field("items", items)
                .finish(),
            Self::Logout => f.write_str("Logout"),
        }
    }
}
