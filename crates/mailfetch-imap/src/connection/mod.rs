//! IMAP connection management.
//!
//! This module provides connection handling for IMAP servers, including:
//! - Configuration (host, port, security mode, connect timeout)
//! - TLS/plaintext stream abstraction and the connect step
//! - Framed I/O for lines and literals
//! - The sequential tagged-command client

mod client;
mod config;
mod framed;
mod stream;

pub use client::Client;
pub use config::{Config, ConfigBuilder, DEFAULT_CONNECT_TIMEOUT, Security};
pub use framed::{FramedStream, MAX_LINE_LENGTH, MAX_LITERAL_SIZE};
pub use stream::{ImapStream, connect, tls_connector};
