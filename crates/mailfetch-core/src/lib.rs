//! # mailfetch-core
//!
//! Session orchestration for `mailfetch`.
//!
//! This crate provides:
//! - Request validation ([`Request::validate`])
//! - The session state machine ([`Session`], [`run`])
//! - The four fetch commands (`retrieve`, `parse`, `mime`, `list`)
//! - The error taxonomy and exit codes ([`ErrorKind`])
//!
//! The transport is any `AsyncRead + AsyncWrite` stream, so a whole run can be
//! driven against an in-memory mock:
//!
//! ```ignore
//! use mailfetch_core::{Operation, Request, run};
//!
//! let request = Request {
//!     operation: Operation::Parse,
//!     username: "alice".into(),
//!     password: "secret".into(),
//!     folder: None,
//!     message: Some("*".into()),
//! };
//! let mut stdout = tokio::io::stdout();
//! run(stream, &request, &mut stdout).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod service;
pub mod session;

pub use config::{DEFAULT_FOLDER, Operation, Request};
pub use error::{Error, ErrorKind, Result};
pub use session::{Session, SessionState, run};
