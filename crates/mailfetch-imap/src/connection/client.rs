//! Sequential IMAP client.
//!
//! Exactly one command is outstanding at a time. Each command gets a fresh
//! tag from the [`TagGenerator`] and the client reads until the completion
//! line carrying that tag, framing any `{n}` literals on the way.

#![allow(clippy::missing_errors_doc)]

use tokio::io::{AsyncRead, AsyncWrite};

use super::framed::FramedStream;
use crate::command::{Command, FetchItems, TagGenerator};
use crate::parser::{ResponseLine, is_ok};
use crate::types::{RawMessage, Selector, Tag};
use crate::{Error, Result};

/// IMAP client over a connected byte stream.
pub struct Client<S> {
    stream: FramedStream<S>,
    tag_gen: TagGenerator,
    current_tag: Option<Tag>,
    /// Completion line already consumed by [`Client::next_message`].
    completion: Option<String>,
}

// Manual Debug implementation since FramedStream doesn't implement Debug
impl<S> std::fmt::Debug for Client<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("current_tag", &self.current_tag)
            .finish_non_exhaustive()
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a connected stream. Nothing is read until
    /// [`Client::read_greeting`].
    pub fn new(stream: S) -> Self {
        Self {
            stream: FramedStream::new(stream),
            tag_gen: TagGenerator::new(),
            current_tag: None,
            completion: None,
        }
    }

    /// Reads the server greeting.
    ///
    /// A `* BYE` greeting or end of stream is a protocol error.
    pub async fn read_greeting(&mut self) -> Result<String> {
        let line = self
            .stream
            .read_line()
            .await?
            .ok_or_else(|| Error::Protocol("connection closed before greeting".to_string()))?;
        let greeting = String::from_utf8_lossy(&line).into_owned();
        tracing::info!(%greeting, "server greeting");

        if greeting
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("* BYE"))
        {
            return Err(Error::Protocol(format!("server refused session: {greeting}")));
        }
        Ok(greeting)
    }

    /// Returns the tag of the most recently sent command.
    #[must_use]
    pub const fn current_tag(&self) -> Option<&Tag> {
        self.current_tag.as_ref()
    }

    /// Sends a command under a fresh tag, which becomes the current tag.
    pub async fn send(&mut self, command: &Command) -> Result<Tag> {
        let tag = self.tag_gen.next()?;
        tracing::debug!(command = %command.redacted(&tag), "C:");

        self.current_tag = Some(tag.clone());
        self.completion = None;
        self.stream.write_command(command, &tag).await?;
        Ok(tag)
    }

    /// Reads up to the completion line of the current command and returns
    /// it. Untagged lines are discarded; literals they announce are read and
    /// dropped so framing stays intact.
    pub async fn read_tagged_result(&mut self) -> Result<String> {
        if let Some(line) = self.completion.take() {
            return Ok(line);
        }

        let tag = self.outstanding()?;
        loop {
            let line = self.read_response_line().await?;
            match ResponseLine::classify(&line, Some(&tag))? {
                ResponseLine::Tagged(_, text) => {
                    tracing::debug!(response = %text, "S:");
                    return Ok(text);
                }
                ResponseLine::Literal { sequence, length } => {
                    tracing::debug!(sequence, length, "discarding literal");
                    self.stream.read_literal(length).await?;
                    self.read_literal_trailer().await?;
                }
                ResponseLine::Untagged(text) => tracing::debug!(response = %text, "S:"),
            }
        }
    }

    /// Authenticates with LOGIN.
    ///
    /// A completion without an `OK` token is [`Error::LoginFailed`].
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.send(&Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;

        let result = self.read_tagged_result().await?;
        if !is_ok(&result) {
            return Err(Error::LoginFailed(result));
        }
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Selects a mailbox.
    ///
    /// A completion without an `OK` token is [`Error::FolderNotFound`].
    pub async fn select(&mut self, mailbox: &str) -> Result<()> {
        self.send(&Command::Select {
            mailbox: mailbox.to_string(),
        })
        .await?;

        let result = self.read_tagged_result().await?;
        if !is_ok(&result) {
            return Err(Error::FolderNotFound(format!("{mailbox}: {result}")));
        }
        tracing::info!(mailbox, "selected");
        Ok(())
    }

    /// Issues a FETCH. Drain the results with [`Client::next_message`] and
    /// finish with [`Client::complete`].
    pub async fn fetch(&mut self, selector: Selector, items: FetchItems) -> Result<()> {
        self.send(&Command::Fetch { selector, items }).await?;
        Ok(())
    }

    /// Returns the next literal of the current command, or `None` once its
    /// completion line has arrived.
    ///
    /// Lines that neither announce a literal nor complete the command
    /// (`* 3 EXISTS`, flag-only FETCH updates, foreign tags) are skipped.
    /// End of stream before the completion line is a protocol error.
    pub async fn next_message(&mut self) -> Result<Option<RawMessage>> {
        if self.completion.is_some() {
            return Ok(None);
        }

        let tag = self.outstanding()?;
        loop {
            let line = self.read_response_line().await?;
            match ResponseLine::classify(&line, Some(&tag))? {
                ResponseLine::Literal { sequence, length } => {
                    let data = self.stream.read_literal(length).await?;
                    self.read_literal_trailer().await?;
                    tracing::debug!(sequence, length, "S: literal");
                    return Ok(Some(RawMessage { sequence, data }));
                }
                ResponseLine::Tagged(_, text) => {
                    tracing::debug!(response = %text, "S:");
                    self.completion = Some(text);
                    return Ok(None);
                }
                ResponseLine::Untagged(text) => {
                    tracing::debug!(response = %text, "skipping line without literal");
                }
            }
        }
    }

    /// Reads the completion of the current command and requires it to be OK.
    ///
    /// Anything else is a protocol error.
    pub async fn complete(&mut self) -> Result<()> {
        let result = self.read_tagged_result().await?;
        if is_ok(&result) {
            Ok(())
        } else {
            Err(Error::Protocol(format!("command failed: {result}")))
        }
    }

    /// Sends LOGOUT. The reply is not read.
    pub async fn logout(&mut self) -> Result<()> {
        self.send(&Command::Logout).await?;
        Ok(())
    }

    /// Shuts down the write half of the transport (TLS `close_notify`
    /// included).
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await
    }

    /// Consumes the client and returns the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    fn outstanding(&self) -> Result<Tag> {
        self.current_tag
            .clone()
            .ok_or_else(|| Error::InvalidState("no command outstanding".to_string()))
    }

    async fn read_response_line(&mut self) -> Result<Vec<u8>> {
        self.stream.read_line().await?.ok_or_else(|| {
            Error::Protocol("connection closed before tagged response".to_string())
        })
    }

    /// Consumes the line that follows a literal (normally `)`).
    async fn read_literal_trailer(&mut self) -> Result<()> {
        let trailer = self.stream.read_line().await?.ok_or_else(|| {
            Error::Protocol("connection closed after literal".to_string())
        })?;
        tracing::trace!(trailer = %String::from_utf8_lossy(&trailer), "literal trailer");
        Ok(())
    }
}
