//! Error types for MIME operations.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
///
/// The display strings are the messages shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The message has no Content-Type header.
    #[error("no content type header")]
    MissingContentType,

    /// The Content-Type is not `multipart/alternative`.
    #[error("content type is not multipart/alternative")]
    UnsupportedContentType(String),

    /// The Content-Type has no boundary parameter.
    #[error("no boundary parameter")]
    MissingBoundary,

    /// The boundary parameter is present but has no usable value.
    #[error("bad boundary parameter: {0}")]
    InvalidBoundary(String),

    /// The boundary does not occur in the body.
    #[error("no boundary in body")]
    BoundaryNotFound,

    /// No part is `text/plain` in UTF-8.
    #[error("no text/plain utf-8 part")]
    NoMatchingPart,
}
