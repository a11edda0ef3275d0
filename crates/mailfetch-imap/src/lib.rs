//! # mailfetch-imap
//!
//! A small, strictly sequential IMAP client: one tagged command in flight,
//! matched to its completion line by tag, with exact-length framing of the
//! `{n}` literals that carry FETCH payloads.
//!
//! Only the commands a fetching tool needs are implemented: LOGIN, SELECT,
//! FETCH and LOGOUT.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailfetch_imap::{Client, Config, FetchItems, Security, Selector};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> mailfetch_imap::Result<()> {
//!     let config = Config::builder("imap.example.com")
//!         .security(Security::Implicit)
//!         .build();
//!     let stream = mailfetch_imap::connection::connect(&config).await?;
//!     let mut client = Client::new(stream);
//!
//!     client.read_greeting().await?;
//!     client.login("user@example.com", "password").await?;
//!     client.select("INBOX").await?;
//!
//!     client.fetch(Selector::Last, FetchItems::FullBody).await?;
//!     if let Some(message) = client.next_message().await? {
//!         client.complete().await?;
//!         println!("{} bytes", message.len());
//!     }
//!
//!     client.logout().await?;
//!     client.shutdown().await
//! }
//! ```
//!
//! ## Modules
//!
//! - [`command`]: command rendering and tag generation
//! - [`connection`]: transport, framing and the client
//! - [`parser`]: sans-I/O response line classification
//! - [`types`]: tags, sequence numbers, selectors and raw messages

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchItems, TagGenerator};
pub use connection::{Client, Config, ConfigBuilder, FramedStream, ImapStream, Security};
pub use error::{Error, Result};
pub use parser::{ResponseLine, is_ok, parse_literal_length};
pub use types::{RawMessage, SeqNum, Selector, Tag};
