//! Command-related types.

/// Data items requested by a FETCH command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchItems {
    /// The complete message, without setting `\Seen`.
    FullBody,
    /// The From, To, Date and Subject header fields.
    HeaderSummary,
    /// Flags plus the Subject header field, for mailbox listings.
    SubjectListing,
}

impl FetchItems {
    /// Returns the wire form of the data items.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullBody => "BODY.PEEK[]",
            Self::HeaderSummary => "BODY.PEEK[HEADER.FIELDS (FROM TO DATE SUBJECT)]",
            Self::SubjectListing => "(FLAGS BODY[HEADER.FIELDS (SUBJECT)])",
        }
    }
}
