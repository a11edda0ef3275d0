//! Line and literal framing over a duplex byte stream.
//!
//! Reads are line-buffered; a `{n}` literal is read as exactly `n` raw bytes.
//! Each command is rendered into a bounded buffer, written whole and flushed
//! before the caller reads the reply.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::command::Command;
use crate::types::Tag;
use crate::{Error, Result};

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum line length. Longer lines are an I/O error, never truncated.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024; // 1 MB

/// Maximum literal size to prevent memory exhaustion.
pub const MAX_LITERAL_SIZE: usize = 100 * 1024 * 1024; // 100 MB

/// A transport with IMAP line and literal framing.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new framed stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
        }
    }

    /// Reads one line and strips its `\r\n` (or bare `\n`) terminator.
    ///
    /// Returns `Ok(None)` at end of stream. A final line without terminator
    /// is returned as-is.
    pub async fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Ok((!line.is_empty()).then_some(line));
            }

            let (chunk, terminated) = match buf.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (buf.len(), false),
            };
            line.extend_from_slice(&buf[..chunk]);
            self.reader.consume(chunk);

            if terminated {
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
            }
            if line.len() > MAX_LINE_LENGTH {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line too long (max {MAX_LINE_LENGTH} bytes)"),
                )));
            }
            if terminated {
                return Ok(Some(line));
            }
        }
    }

    /// Reads exactly `length` bytes of literal data.
    ///
    /// No line interpretation is applied; embedded CRLFs are data.
    pub async fn read_literal(&mut self, length: usize) -> Result<Vec<u8>> {
        if length > MAX_LITERAL_SIZE {
            return Err(Error::Protocol(format!(
                "literal too large: {length} bytes (max {MAX_LITERAL_SIZE})"
            )));
        }

        let mut literal = vec![0u8; length];
        self.reader.read_exact(&mut literal).await?;
        Ok(literal)
    }

    /// Renders `command` under `tag` into the write buffer, writes it out
    /// in full and flushes.
    ///
    /// A command that does not fit in
    /// [`MAX_COMMAND_LENGTH`](crate::command::MAX_COMMAND_LENGTH) bytes is
    /// refused before anything is written.
    pub async fn write_command(&mut self, command: &Command, tag: &Tag) -> Result<()> {
        command.encode(tag, &mut self.write_buffer)?;

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buffer).await?;
        stream.flush().await?;

        Ok(())
    }

    /// Shuts down the write half of the underlying stream.
    ///
    /// For TLS streams this sends `close_notify` first.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.reader.get_mut().shutdown().await?;
        Ok(())
    }

    /// Returns the transport, discarding anything still buffered.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}
