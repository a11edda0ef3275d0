//! Content-Type checks and boundary extraction.
//!
//! Matching is an ASCII case-insensitive substring search over the raw
//! header value, which is all the multipart scanner needs.

use crate::error::{Error, Result};

const MULTIPART_ALTERNATIVE: &[u8] = b"multipart/alternative";
const TEXT_PLAIN: &[u8] = b"text/plain";
const UTF_8: &[u8] = b"utf-8";
const BOUNDARY: &[u8] = b"boundary";

/// Returns true if the value names `multipart/alternative`.
#[must_use]
pub fn is_multipart_alternative(content_type: &[u8]) -> bool {
    contains_ignore_case(content_type, MULTIPART_ALTERNATIVE)
}

/// Returns true if the value names `text/plain` and mentions `utf-8`.
#[must_use]
pub fn is_text_plain_utf8(content_type: &[u8]) -> bool {
    contains_ignore_case(content_type, TEXT_PLAIN) && contains_ignore_case(content_type, UTF_8)
}

/// Extracts the `boundary` parameter from a Content-Type value.
///
/// The parameter name is matched case-insensitively and may be surrounded
/// by whitespace before the `=`. A quoted value runs to the next `"`; a bare
/// value runs to `;`, whitespace or the end. The value keeps its case.
///
/// # Errors
///
/// - [`Error::MissingBoundary`] if there is no `boundary` parameter.
/// - [`Error::InvalidBoundary`] if it has no `=`, an unterminated quote or
///   an empty value.
pub fn boundary(content_type: &[u8]) -> Result<&[u8]> {
    let mut search_from = 0;
    let mut seen_name = false;

    while let Some(rel) = find_ignore_case(&content_type[search_from..], BOUNDARY) {
        let name_end = search_from + rel + BOUNDARY.len();
        search_from = name_end;
        seen_name = true;

        let rest = skip_whitespace(&content_type[name_end..]);
        if let Some(value) = rest.strip_prefix(b"=") {
            return parse_value(skip_whitespace(value), content_type);
        }
    }

    if seen_name {
        Err(invalid(content_type))
    } else {
        Err(Error::MissingBoundary)
    }
}

fn parse_value<'a>(value: &'a [u8], content_type: &[u8]) -> Result<&'a [u8]> {
    let token = if let Some(quoted) = value.strip_prefix(b"\"") {
        let end = quoted
            .iter()
            .position(|&b| b == b'"')
            .ok_or_else(|| invalid(content_type))?;
        &quoted[..end]
    } else {
        let end = value
            .iter()
            .position(|&b| b == b';' || b.is_ascii_whitespace())
            .unwrap_or(value.len());
        &value[..end]
    };

    if token.is_empty() {
        return Err(invalid(content_type));
    }
    Ok(token)
}

fn invalid(content_type: &[u8]) -> Error {
    Error::InvalidBoundary(String::from_utf8_lossy(content_type).into_owned())
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Returns the offset of the first ASCII case-insensitive match of `needle`.
fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

fn contains_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    find_ignore_case(haystack, needle).is_some()
}
