//! Session state machine.
//!
//! A session owns the transport from the moment it is connected until
//! teardown:
//!
//! ```text
//! Connected ─ login ─→ LoggedIn ─ select ─→ FolderSelected
//!                                                │
//!          ┌──────────────┬───────────────┬──────┴───────┐
//!          ▼              ▼               ▼              ▼
//!     Retrieving       Parsing     ExtractingMime     Listing
//!          └──────────────┴───────┬───────┴──────────────┘
//!                                 ▼
//!                               Done ─ close ─→ Disconnected
//! ```
//!
//! Any failure moves the session to `Error`. [`Session::close`] always sends
//! a best-effort LOGOUT and shuts the transport down, whatever the state.

use mailfetch_imap::{Client, Selector};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::{Operation, Request};
use crate::service;
use crate::{Error, Result};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Transport closed.
    Disconnected,
    /// Transport open, greeting not yet read.
    Connected,
    /// LOGIN accepted.
    LoggedIn,
    /// SELECT accepted.
    FolderSelected,
    /// Running `retrieve`.
    Retrieving,
    /// Running `parse`.
    Parsing,
    /// Running `mime`.
    ExtractingMime,
    /// Running `list`.
    Listing,
    /// Operation finished.
    Done,
    /// A step failed.
    Error,
}

/// An IMAP session over a connected transport.
pub struct Session<S> {
    client: Client<S>,
    state: SessionState,
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .field("state", &self.state)
            .finish()
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Starts a session on a connected transport.
    pub fn new(stream: S) -> Self {
        Self {
            client: Client::new(stream),
            state: SessionState::Connected,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Reads the greeting and logs in.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `Connected`; a protocol error for a
    /// `* BYE` greeting; a login failure if the server rejects LOGIN.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.require("login", SessionState::Connected)?;
        let result = self.greet_and_login(username, password).await;
        self.settle(result, SessionState::LoggedIn)
    }

    /// Selects `folder`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] unless `LoggedIn`; folder not found if the
    /// server rejects SELECT.
    pub async fn select(&mut self, folder: &str) -> Result<()> {
        self.require("select", SessionState::LoggedIn)?;
        let result = self.client.select(folder).await.map_err(Error::from);
        self.settle(result, SessionState::FolderSelected)
    }

    /// Writes one raw message to `out`.
    ///
    /// # Errors
    ///
    /// See [`service::retrieve`].
    pub async fn retrieve<W>(&mut self, selector: Selector, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.begin("retrieve", SessionState::Retrieving)?;
        let result = service::retrieve(&mut self.client, selector, out).await;
        self.settle(result, SessionState::Done)
    }

    /// Writes the header summary of one message to `out`.
    ///
    /// # Errors
    ///
    /// See [`service::parse`].
    pub async fn parse<W>(&mut self, selector: Selector, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.begin("parse", SessionState::Parsing)?;
        let result = service::parse(&mut self.client, selector, out).await;
        self.settle(result, SessionState::Done)
    }

    /// Writes the `text/plain` part of one multipart message to `out`.
    ///
    /// # Errors
    ///
    /// See [`service::mime`].
    pub async fn mime<W>(&mut self, selector: Selector, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.begin("mime", SessionState::ExtractingMime)?;
        let result = service::mime(&mut self.client, selector, out).await;
        self.settle(result, SessionState::Done)
    }

    /// Writes one line per message to `out`.
    ///
    /// # Errors
    ///
    /// See [`service::list`].
    pub async fn list<W>(&mut self, out: &mut W) -> Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        self.begin("list", SessionState::Listing)?;
        let result = service::list(&mut self.client, out).await;
        self.settle(result, SessionState::Done)
    }

    /// Sends a best-effort LOGOUT, shuts the transport down and drops it.
    ///
    /// Each step runs regardless of earlier failures, which are only logged.
    pub async fn close(mut self) {
        if let Err(err) = self.client.logout().await {
            tracing::warn!(error = %err, "LOGOUT failed");
        }
        if let Err(err) = self.client.shutdown().await {
            tracing::warn!(error = %err, "transport shutdown failed");
        }
        self.advance(SessionState::Disconnected);
    }

    async fn execute<W>(&mut self, request: &Request, selector: Selector, out: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.login(&request.username, &request.password).await?;
        self.select(request.folder()).await?;

        tracing::info!(operation = request.operation.name(), %selector, "running");
        match request.operation {
            Operation::Retrieve => self.retrieve(selector, out).await,
            Operation::Parse => self.parse(selector, out).await,
            Operation::Mime => self.mime(selector, out).await,
            Operation::List => self.list(out).await.map(drop),
        }
    }

    async fn greet_and_login(&mut self, username: &str, password: &str) -> Result<()> {
        self.client.read_greeting().await?;
        self.client.login(username, password).await?;
        Ok(())
    }

    fn require(&self, operation: &'static str, expected: SessionState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                operation,
                expected,
                actual: self.state,
            })
        }
    }

    fn begin(&mut self, operation: &'static str, running: SessionState) -> Result<()> {
        self.require(operation, SessionState::FolderSelected)?;
        self.advance(running);
        Ok(())
    }

    fn settle<T>(&mut self, result: Result<T>, next: SessionState) -> Result<T> {
        match &result {
            Ok(_) => self.advance(next),
            Err(err) => {
                tracing::warn!(state = ?self.state, error = %err, "session step failed");
                self.state = SessionState::Error;
            }
        }
        result
    }

    fn advance(&mut self, next: SessionState) {
        tracing::info!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

/// Runs one request over a connected transport, writing command output to
/// `out`.
///
/// The request is validated before the transport is touched. The session is
/// closed on every path once it exists.
///
/// # Errors
///
/// Returns the first failure; its [`Error::kind`] determines the exit code.
pub async fn run<S, W>(stream: S, request: &Request, out: &mut W) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let selector = request.validate()?;

    let mut session = Session::new(stream);
    let result = session.execute(request, selector, out).await;
    session.close().await;
    result
}
