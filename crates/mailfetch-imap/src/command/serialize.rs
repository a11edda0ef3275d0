//! Command serialization helpers.

use super::types::FetchItems;

/// Writes a quoted string, escaping backslash, double quote, CR and LF.
///
/// CR and LF become the two-character sequences `\r` and `\n`, so a crafted
/// credential can never terminate the command line early.
pub fn write_quoted(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for b in s.bytes() {
        match b {
            b'\\' => buf.extend_from_slice(b"\\\\"),
            b'"' => buf.extend_from_slice(b"\\\""),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            _ => buf.push(b),
        }
    }
    buf.push(b'"');
}

/// Writes FETCH data items.
pub fn write_fetch_items(buf: &mut Vec<u8>, items: FetchItems) {
    buf.extend_from_slice(items.as_str().as_bytes());
}
