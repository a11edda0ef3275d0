//! RFC 822 message splitting, unfolding and header extraction.
//!
//! A message is never modified in place: the body is a view into the raw
//! buffer and header values are views into a separately unfolded copy of
//! the header block.

use std::fmt;
use std::ops::Range;

/// Separator between the header block and the body.
pub const HEADER_DELIMITER: &[u8] = b"\r\n\r\n";

/// Header fields the parser extracts. All others are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    /// `MIME-Version`
    MimeVersion,
    /// `From`
    From,
    /// `Date`
    Date,
    /// `Subject`
    Subject,
    /// `To`
    To,
    /// `Content-Type`
    ContentType,
}

impl HeaderField {
    const ALL: [Self; 6] = [
        Self::MimeVersion,
        Self::From,
        Self::Date,
        Self::Subject,
        Self::To,
        Self::ContentType,
    ];

    /// Returns the canonical field name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MimeVersion => "MIME-Version",
            Self::From => "From",
            Self::Date => "Date",
            Self::Subject => "Subject",
            Self::To => "To",
            Self::ContentType => "Content-Type",
        }
    }

    /// Matches a field name case-insensitively.
    #[must_use]
    pub fn from_name(name: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().as_bytes().eq_ignore_ascii_case(name))
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value ranges of the extracted fields, relative to the unfolded header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    values: [Option<Range<usize>>; 6],
}

impl HeaderFields {
    /// Returns the byte range of `field`'s value, if present.
    #[must_use]
    pub fn range(&self, field: HeaderField) -> Option<Range<usize>> {
        self.values[field.index()].clone()
    }

    /// Returns `field`'s value, resolved against the unfolded header it was
    /// parsed from.
    #[must_use]
    pub fn get<'h>(&self, unfolded: &'h [u8], field: HeaderField) -> Option<&'h [u8]> {
        self.range(field).and_then(|range| unfolded.get(range))
    }
}

/// Splits a raw message at the first CRLFCRLF.
///
/// Returns the header block and, if the delimiter is present, the body.
/// Without a delimiter the whole buffer is header.
#[must_use]
pub fn split(buffer: &[u8]) -> (&[u8], Option<&[u8]>) {
    match find(buffer, HEADER_DELIMITER) {
        Some(pos) => (
            &buffer[..pos],
            Some(&buffer[pos + HEADER_DELIMITER.len()..]),
        ),
        None => (buffer, None),
    }
}

/// Removes every CRLF that is immediately followed by a space or tab.
///
/// The result never contains CRLF followed by whitespace, so applying
/// `unfold` to its own output changes nothing.
#[must_use]
pub fn unfold(header: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(header.len());
    for &byte in header {
        if byte == b' ' || byte == b'\t' {
            while out.ends_with(b"\r\n") {
                out.truncate(out.len() - 2);
            }
        }
        out.push(byte);
    }
    out
}

/// Extracts the known fields from an unfolded header block.
///
/// Lines end at LF with an optional preceding CR. Each line is split at its
/// first colon; lines without one are skipped. Leading spaces and tabs are
/// trimmed from values, and `Subject` also loses trailing spaces. When a
/// field repeats, the last occurrence wins.
#[must_use]
pub fn parse_fields(unfolded: &[u8]) -> HeaderFields {
    let mut fields = HeaderFields::default();
    let mut offset = 0;

    for raw_line in unfolded.split(|&b| b == b'\n') {
        let start = offset;
        offset += raw_line.len() + 1;

        let line = raw_line.strip_suffix(b"\r").unwrap_or(raw_line);
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        let Some(field) = HeaderField::from_name(line[..colon].trim_ascii()) else {
            continue;
        };

        let mut value_start = colon + 1;
        while line.get(value_start).is_some_and(|&b| b == b' ' || b == b'\t') {
            value_start += 1;
        }
        let mut value_end = line.len();
        if field == HeaderField::Subject {
            while value_end > value_start && line[value_end - 1] == b' ' {
                value_end -= 1;
            }
        }

        fields.values[field.index()] = Some(start + value_start..start + value_end);
    }

    fields
}

/// A parsed message (or MIME part).
#[derive(Clone, PartialEq, Eq)]
pub struct ParsedMessage<'a> {
    unfolded: Vec<u8>,
    fields: HeaderFields,
    body: Option<&'a [u8]>,
}

impl<'a> ParsedMessage<'a> {
    /// Parses a raw message.
    #[must_use]
    pub fn parse(buffer: &'a [u8]) -> Self {
        let (header, body) = split(buffer);
        let unfolded = unfold(header);
        let fields = parse_fields(&unfolded);
        Self {
            unfolded,
            fields,
            body,
        }
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn field(&self, field: HeaderField) -> Option<&[u8]> {
        self.fields.get(&self.unfolded, field)
    }

    /// Returns the `MIME-Version` value.
    #[must_use]
    pub fn mime_version(&self) -> Option<&[u8]> {
        self.field(HeaderField::MimeVersion)
    }

    /// Returns the `From` value.
    #[must_use]
    pub fn from(&self) -> Option<&[u8]> {
        self.field(HeaderField::From)
    }

    /// Returns the `Date` value.
    #[must_use]
    pub fn date(&self) -> Option<&[u8]> {
        self.field(HeaderField::Date)
    }

    /// Returns the `Subject` value.
    #[must_use]
    pub fn subject(&self) -> Option<&[u8]> {
        self.field(HeaderField::Subject)
    }

    /// Returns the `To` value.
    #[must_use]
    pub fn to(&self) -> Option<&[u8]> {
        self.field(HeaderField::To)
    }

    /// Returns the `Content-Type` value.
    #[must_use]
    pub fn content_type(&self) -> Option<&[u8]> {
        self.field(HeaderField::ContentType)
    }

    /// Returns the body, a view into the raw buffer after CRLFCRLF.
    #[must_use]
    pub const fn body(&self) -> Option<&'a [u8]> {
        self.body
    }

    /// Returns the body length, 0 when there is no body.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.map_or(0, <[u8]>::len)
    }

    /// Returns the unfolded header block.
    #[must_use]
    pub fn header(&self) -> &[u8] {
        &self.unfolded
    }
}

impl fmt::Debug for ParsedMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ParsedMessage");
        for field in HeaderField::ALL {
            if let Some(value) = self.field(field) {
                s.field(field.name(), &String::from_utf8_lossy(value));
            }
        }
        s.field("body_len", &self.body_len()).finish()
    }
}

/// Returns the offset of the first occurrence of `needle`.
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
