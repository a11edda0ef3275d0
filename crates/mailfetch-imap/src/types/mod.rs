//! Core IMAP types.

#![allow(clippy::missing_const_for_fn)]

mod identifiers;
mod message;
mod sequence;

pub use identifiers::{SeqNum, Tag};
pub use message::RawMessage;
pub use sequence::Selector;
