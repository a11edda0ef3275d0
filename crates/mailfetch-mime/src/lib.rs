//! # mailfetch-mime
//!
//! Message parsing for fetched mail.
//!
//! ## Features
//!
//! - **Header extraction**: split at CRLFCRLF, RFC 822 unfolding and
//!   case-insensitive lookup of `From`, `To`, `Date`, `Subject`,
//!   `MIME-Version` and `Content-Type`
//! - **Zero-copy bodies**: the body is a view into the raw buffer; only the
//!   header block is copied (unfolded)
//! - **Multipart**: boundary extraction and selection of the
//!   `text/plain; charset=utf-8` part of a `multipart/alternative` body
//!
//! ## Quick Start
//!
//! ```
//! use mailfetch_mime::{ParsedMessage, boundary, find_text_part, is_multipart_alternative};
//!
//! let raw = b"Subject: Test\r\n\
//!             Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
//!             \r\n\
//!             --sep\r\n\
//!             Content-Type: text/plain; charset=utf-8\r\n\
//!             \r\n\
//!             Hello!\r\n\
//!             --sep--\r\n";
//!
//! let message = ParsedMessage::parse(raw);
//! assert_eq!(message.subject(), Some(&b"Test"[..]));
//!
//! let content_type = message.content_type().unwrap();
//! assert!(is_multipart_alternative(content_type));
//!
//! let sep = boundary(content_type)?;
//! let part = find_text_part(message.body().unwrap(), sep)?;
//! assert_eq!(part.body(), Some(&b"Hello!"[..]));
//! # Ok::<(), mailfetch_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod message;
mod multipart;

pub use content_type::{boundary, is_multipart_alternative, is_text_plain_utf8};
pub use error::{Error, Result};
pub use message::{
    HEADER_DELIMITER, HeaderField, HeaderFields, ParsedMessage, parse_fields, split, unfold,
};
pub use multipart::{MimePart, find_text_part};
