//! The fetch commands: retrieve, parse, mime and list.
//!
//! Each command runs against a client whose folder is already selected and
//! writes its output to an async sink.

use mailfetch_imap::{Client, FetchItems, RawMessage, Selector};
use mailfetch_mime::{ParsedMessage, boundary, find_text_part, is_multipart_alternative};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::{Error, Result};

/// Shown for a missing or empty Subject.
pub const NO_SUBJECT: &[u8] = b"<No subject>";

/// Writes the raw bytes of one message to `out`.
///
/// # Errors
///
/// [`Error::MessageNotFound`] if the FETCH returns no literal or a
/// zero-length one; IMAP errors
/// for a failed completion; [`Error::Io`] if the sink fails.
pub async fn retrieve<S, W>(client: &mut Client<S>, selector: Selector, out: &mut W) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let message = fetch_one(client, selector, FetchItems::FullBody).await?;
    out.write_all(&message.data).await?;
    out.flush().await?;
    Ok(())
}

/// Writes the From, To, Date and Subject of one message to `out`.
///
/// # Errors
///
/// As for [`retrieve`].
pub async fn parse<S, W>(client: &mut Client<S>, selector: Selector, out: &mut W) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let message = fetch_one(client, selector, FetchItems::HeaderSummary).await?;
    let parsed = ParsedMessage::parse(&message.data);
    out.write_all(&render_summary(&parsed)).await?;
    out.flush().await?;
    Ok(())
}

/// Writes the body of the `text/plain; charset=utf-8` part of one
/// `multipart/alternative` message to `out`.
///
/// # Errors
///
/// As for [`retrieve`], plus [`Error::Mime`] when the message has no usable
/// part.
pub async fn mime<S, W>(client: &mut Client<S>, selector: Selector, out: &mut W) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let message = fetch_one(client, selector, FetchItems::FullBody).await?;
    let body = extract_text_part(&message.data)?;
    out.write_all(body).await?;
    out.flush().await?;
    Ok(())
}

/// Writes `<sequence>: <subject>` for every message in the folder and
/// returns how many were listed.
///
/// A zero-length literal ends the listing; the rest of the reply is read
/// and discarded up to the completion.
///
/// # Errors
///
/// IMAP errors, including a non-OK completion after the listing;
/// [`Error::Io`] if the sink fails.
pub async fn list<S, W>(client: &mut Client<S>, out: &mut W) -> Result<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    client
        .fetch(Selector::All, FetchItems::SubjectListing)
        .await?;

    let mut count = 0;
    while let Some(message) = client.next_message().await? {
        if message.is_empty() {
            tracing::debug!(sequence = message.sequence, "empty literal ends the listing");
            break;
        }
        let parsed = ParsedMessage::parse(&message.data);
        out.write_all(&render_listing_line(message.sequence, &parsed))
            .await?;
        count += 1;
    }
    while let Some(skipped) = client.next_message().await? {
        tracing::debug!(sequence = skipped.sequence, "ignoring literal after end of listing");
    }
    client.complete().await?;
    out.flush().await?;

    tracing::info!(count, "listed messages");
    Ok(count)
}

/// Selects the `text/plain; charset=utf-8` part of a raw
/// `multipart/alternative` message and returns its body.
///
/// # Errors
///
/// Returns [`Error::Mime`] if the Content-Type is missing or not
/// `multipart/alternative`, the boundary is missing or malformed, or no
/// part matches.
pub fn extract_text_part(raw: &[u8]) -> Result<&[u8]> {
    let parsed = ParsedMessage::parse(raw);
    let content_type = parsed
        .content_type()
        .ok_or(mailfetch_mime::Error::MissingContentType)?;
    tracing::debug!(
        content_type = %String::from_utf8_lossy(content_type),
        "checking content type"
    );

    if !is_multipart_alternative(content_type) {
        return Err(mailfetch_mime::Error::UnsupportedContentType(
            String::from_utf8_lossy(content_type).into_owned(),
        )
        .into());
    }

    let boundary = boundary(content_type)?;
    tracing::debug!(boundary = %String::from_utf8_lossy(boundary), "scanning parts");

    let part = find_text_part(parsed.body().unwrap_or_default(), boundary)?;
    Ok(part.body().unwrap_or_default())
}

/// Renders the `parse` output.
///
/// Absent fields print as the bare label; an absent or empty Subject
/// prints as [`NO_SUBJECT`].
#[must_use]
pub fn render_summary(message: &ParsedMessage<'_>) -> Vec<u8> {
    let mut out = Vec::new();
    push_field(&mut out, b"From:", message.from());
    push_field(&mut out, b"To:", message.to());
    push_field(&mut out, b"Date:", message.date());
    push_field(&mut out, b"Subject:", Some(subject_or_default(message)));
    out
}

/// Renders one `list` line.
#[must_use]
pub fn render_listing_line(sequence: u32, message: &ParsedMessage<'_>) -> Vec<u8> {
    let mut line = format!("{sequence}: ").into_bytes();
    line.extend_from_slice(subject_or_default(message));
    line.push(b'\n');
    line
}

async fn fetch_one<S>(
    client: &mut Client<S>,
    selector: Selector,
    items: FetchItems,
) -> Result<RawMessage>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    client.fetch(selector, items).await?;

    let Some(message) = client.next_message().await? else {
        tracing::info!(%selector, "no literal before completion");
        return Err(Error::MessageNotFound(selector.to_string()));
    };
    client.complete().await?;
    if message.is_empty() {
        tracing::info!(%selector, sequence = message.sequence, "empty literal");
        return Err(Error::MessageNotFound(selector.to_string()));
    }

    tracing::debug!(sequence = message.sequence, bytes = message.len(), "fetched");
    Ok(message)
}

fn subject_or_default<'m>(message: &'m ParsedMessage<'_>) -> &'m [u8] {
    message
        .subject()
        .filter(|subject| !subject.is_empty())
        .unwrap_or(NO_SUBJECT)
}

fn push_field(out: &mut Vec<u8>, label: &[u8], value: Option<&[u8]>) {
    out.extend_from_slice(label);
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        out.push(b' ');
        out.extend_from_slice(value);
    }
    out.push(b'\n');
}
