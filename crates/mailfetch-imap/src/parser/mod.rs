//! Response line classification.
//!
//! The client only needs a small part of the IMAP response grammar: whether a
//! line is untagged, whether it completes the outstanding command, and
//! whether it announces a literal. Everything here is sans-I/O and works on
//! a single line with its terminator already stripped.

use crate::types::Tag;
use crate::{Error, Result};

/// One server response line, classified against the outstanding tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseLine {
    /// Untagged (`*`), continuation (`+`) or otherwise unrelated line.
    Untagged(String),
    /// Completion line for the outstanding command.
    Tagged(Tag, String),
    /// Untagged FETCH line announcing a literal of `length` bytes.
    Literal {
        /// Message sequence number from the start of the line.
        sequence: u32,
        /// Declared literal length.
        length: usize,
    },
}

impl ResponseLine {
    /// Classifies a line against the currently outstanding tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] if an untagged line ends with `}` but the
    /// literal marker or the sequence number is malformed.
    pub fn classify(line: &[u8], tag: Option<&Tag>) -> Result<Self> {
        let text = String::from_utf8_lossy(line).into_owned();

        if let Some(tag) = tag
            && tag.tags(line)
        {
            return Ok(Self::Tagged(tag.clone(), text));
        }

        if line.starts_with(b"*") && line.ends_with(b"}") {
            let length = parse_literal_length(line)?;
            let sequence = parse_sequence(line)?;
            return Ok(Self::Literal { sequence, length });
        }

        Ok(Self::Untagged(text))
    }
}

/// Returns true if a completion line reports success.
///
/// Success is a whitespace-delimited `ok` token anywhere in the line,
/// compared case-insensitively.
#[must_use]
pub fn is_ok(line: &str) -> bool {
    line.split_ascii_whitespace()
        .any(|token| token.eq_ignore_ascii_case("ok"))
}

/// Parses the literal length from the end of a line.
///
/// Matches `{123}` or the non-synchronizing `{123+}` at the very end of the
/// line (terminator already stripped).
///
/// # Errors
///
/// Returns [`Error::Framing`] if no `{n}` marker ends the line or the digits
/// do not form a valid length.
pub fn parse_literal_length(line: &[u8]) -> Result<usize> {
    let inner = line
        .strip_suffix(b"}")
        .ok_or_else(|| framing("line does not end with a literal marker", line))?;
    let open = inner
        .iter()
        .rposition(|&b| b == b'{')
        .ok_or_else(|| framing("literal marker has no opening brace", line))?;

    let digits = &inner[open + 1..];
    let digits = digits.strip_suffix(b"+").unwrap_or(digits);
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(framing("literal length is not a number", line));
    }

    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| framing("literal length out of range", line))
}

/// Parses the message sequence number from `* <n> FETCH ...`.
fn parse_sequence(line: &[u8]) -> Result<u32> {
    let rest = line.strip_prefix(b"*").unwrap_or(line);
    let token = rest
        .split(|&b| b == b' ')
        .find(|token| !token.is_empty())
        .ok_or_else(|| framing("missing message sequence number", line))?;

    std::str::from_utf8(token)
        .ok()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| framing("invalid message sequence number", line))
}

fn framing(message: &str, line: &[u8]) -> Error {
    Error::Framing(format!("{message}: {}", String::from_utf8_lossy(line)))
}
