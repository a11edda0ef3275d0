//! Message selectors for FETCH.

use super::SeqNum;
use crate::{Error, Result};

/// Which message(s) a FETCH addresses.
///
/// Only single messages are accepted from users; `All` is used internally
/// for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector {
    /// The last message in the mailbox (`*`).
    #[default]
    Last,
    /// A single message by sequence number.
    Single(SeqNum),
    /// Every message in the mailbox (`1:*`).
    All,
}

impl Selector {
    /// Parses a user-supplied message selector.
    ///
    /// `None` selects the last message. Range (`:`) and list (`,`) syntax is
    /// rejected, as is anything that is not `*` or a positive number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for unsupported or malformed selectors.
    pub fn parse(selector: Option<&str>) -> Result<Self> {
        let Some(selector) = selector else {
            return Ok(Self::Last);
        };

        if selector.contains(':') || selector.contains(',') {
            return Err(Error::Config(format!(
                "bad message num given: {selector} (ranges and lists are not supported)"
            )));
        }

        if selector == "*" {
            return Ok(Self::Last);
        }

        SeqNum::parse(selector)
            .map(Self::Single)
            .ok_or_else(|| Error::Config(format!("bad message num given: {selector}")))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Last => write!(f, "*"),
            Self::Single(n) => write!(f, "{n}"),
            Self::All => write!(f, "1:*"),
        }
    }
}
