//! `multipart/alternative` scanning.

use crate::content_type::is_text_plain_utf8;
use crate::error::{Error, Result};
use crate::message::{ParsedMessage, find};

/// A single part of a multipart body.
pub type MimePart<'a> = ParsedMessage<'a>;

/// Returns the first part of `body` whose Content-Type is `text/plain` in
/// UTF-8.
///
/// Parts start after the line holding a boundary occurrence and end before
/// the `--` and line break that precede the next one. Parts without a
/// Content-Type, or with no bytes between two boundaries, are skipped.
///
/// # Errors
///
/// - [`Error::BoundaryNotFound`] if `boundary` never occurs in `body`.
/// - [`Error::NoMatchingPart`] if the closing delimiter or the end of the
///   body is reached first.
pub fn find_text_part<'a>(body: &'a [u8], boundary: &[u8]) -> Result<MimePart<'a>> {
    let first = find(body, boundary).ok_or(Error::BoundaryNotFound)?;
    let mut delimiter_end = first + boundary.len();

    loop {
        if body[delimiter_end..].starts_with(b"--") {
            tracing::debug!("closing delimiter reached");
            return Err(Error::NoMatchingPart);
        }

        let part_start = line_end(body, delimiter_end);
        let Some(rel) = find(&body[part_start..], boundary) else {
            tracing::debug!(part_start, "no further boundary");
            return Err(Error::NoMatchingPart);
        };
        let next = part_start + rel;
        let part_end = strip_delimiter_prefix(body, next);

        if part_end > part_start {
            let part = ParsedMessage::parse(&body[part_start..part_end]);
            match part.content_type() {
                Some(content_type) if is_text_plain_utf8(content_type) => {
                    tracing::debug!(part_start, part_end, "selected text/plain part");
                    return Ok(part);
                }
                Some(content_type) => tracing::debug!(
                    content_type = %String::from_utf8_lossy(content_type),
                    "skipping part"
                ),
                None => tracing::warn!(part_start, part_end, "part without content type"),
            }
        } else {
            tracing::warn!(part_start, part_end, "empty part");
        }

        delimiter_end = next + boundary.len();
    }
}

/// Returns the offset just past the line break that ends the line
/// containing `from`, or the end of `body`.
fn line_end(body: &[u8], from: usize) -> usize {
    body[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(body.len(), |pos| from + pos + 1)
}

/// Backs up from a boundary occurrence over the leading `--` and one line
/// break.
fn strip_delimiter_prefix(body: &[u8], boundary_at: usize) -> usize {
    let mut end = boundary_at;
    if body[..end].ends_with(b"--") {
        end -= 2;
    }
    if body[..end].ends_with(b"\r\n") {
        end -= 2;
    } else if body[..end].ends_with(b"\n") {
        end -= 1;
    }
    end
}
