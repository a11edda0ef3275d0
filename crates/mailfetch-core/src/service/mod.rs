//! Core services for mail operations.
//!
//! This module provides the service layer that bridges the session state
//! machine with the IMAP and MIME libraries.

pub mod fetch;

pub use fetch::{
    NO_SUBJECT, extract_text_part, list, mime, parse, render_listing_line, render_summary,
    retrieve,
};
