//! IMAP command tag generator.
//!
//! Tags are used to match commands with their responses.

use crate::types::Tag;
use crate::{Error, Result};

/// Tag generator for IMAP commands.
///
/// Generates strictly increasing tags of four lower-case hex digits:
/// "0001", "0002", ... "000a", ... "ffff". The counter starts at zero and is
/// incremented before each tag is produced.
#[derive(Debug, Clone, Default)]
pub struct TagGenerator {
    counter: u16,
}

impl TagGenerator {
    /// Creates a new tag generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { counter: 0 }
    }

    /// Generates the next tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] once all 65535 tags have been issued;
    /// the counter never wraps, so a tag is never reused within a session.
    pub fn next(&mut self) -> Result<Tag> {
        self.counter = self
            .counter
            .checked_add(1)
            .ok_or_else(|| Error::Protocol("tag counter exhausted".to_string()))?;
        Ok(Tag::new(format!("{:04x}", self.counter)))
    }

    /// Returns the current counter value without incrementing.
    #[must_use]
    pub const fn current(&self) -> u16 {
        self.counter
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::unreadable_literal
)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_tag_generation() {
        let mut generator = TagGenerator::default();
        assert_eq!(generator.next().unwrap().as_str(), "0001");
        assert_eq!(generator.next().unwrap().as_str(), "0002");
        assert_eq!(generator.next().unwrap().as_str(), "0003");
    }

    #[test]
    fn test_hex_format() {
        let mut generator = TagGenerator::new();
        for _ in 0..9 {
            let _ = generator.next().unwrap();
        }
        assert_eq!(generator.next().unwrap().as_str(), "000a");
        for _ in 10..255 {
            let _ = generator.next().unwrap();
        }
        assert_eq!(generator.next().unwrap().as_str(), "0100");
    }

    #[test]
    fn test_current() {
        let mut generator = TagGenerator::default();
        assert_eq!(generator.current(), 0);
        let _ = generator.next().unwrap();
        assert_eq!(generator.current(), 1);
    }

    #[test]
    fn test_exhaustion_is_an_error() {
        let mut generator = TagGenerator { counter: u16::MAX - 1 };
        assert_eq!(generator.next().unwrap().as_str(), "ffff");
        assert!(matches!(generator.next(), Err(Error::Protocol(_))));
        // Still exhausted, never wraps back to "0000".
        assert!(generator.next().is_err());
    }

    proptest! {
        #[test]
        fn prop_tags_strictly_increase(count in 1usize..2000) {
            let mut generator = TagGenerator::new();
            let mut previous: Option<u16> = None;
            for _ in 0..count {
                let tag = generator.next().unwrap();
                prop_assert_eq!(tag.as_str().len(), 4);
                let value = u16::from_str_radix(tag.as_str(), 16).unwrap();
                if let Some(prev) = previous {
                    prop_assert!(value > prev);
                }
                previous = Some(value);
            }
        }
    }
}
