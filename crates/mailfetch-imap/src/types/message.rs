//! Message payloads delivered by FETCH.

/// The payload of one FETCH literal.
///
/// `data` holds exactly the number of bytes the server announced in the
/// `{n}` marker; the sequence number comes from the `* <n> FETCH` prefix of
/// the same line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Message sequence number.
    pub sequence: u32,
    /// Literal bytes, verbatim.
    pub data: Vec<u8>,
}

impl RawMessage {
    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the literal was `{0}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
