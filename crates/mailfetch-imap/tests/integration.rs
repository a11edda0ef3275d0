//! Integration tests for the IMAP client.
//!
//! These tests use a mock stream to simulate IMAP server responses
//! without requiring a real server connection.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::task::{Context, Poll};

use proptest::prelude::*;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use mailfetch_imap::{Client, Error, FetchItems, Selector};

/// Mock stream that returns predefined responses.
struct MockStream {
    /// Responses to return (in order).
    responses: Cursor<Vec<u8>>,
    /// Captured commands sent by the client.
    sent: Vec<u8>,
    shut_down: bool,
}

impl MockStream {
    fn new(responses: &[u8]) -> Self {
        Self {
            responses: Cursor::new(responses.to_vec()),
            sent: Vec::new(),
            shut_down: false,
        }
    }

    fn sent_data(&self) -> &[u8] {
        &self.sent
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let data = self.responses.get_ref();
        let pos = self.responses.position() as usize;

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shut_down = true;
        Poll::Ready(Ok(()))
    }
}

fn literal_response(sequence: u32, payload: &[u8], tag: &str) -> Vec<u8> {
    let mut response = format!("* {sequence} FETCH (BODY[] {{{}}}\r\n", payload.len()).into_bytes();
    response.extend_from_slice(payload);
    response.extend_from_slice(b")\r\n");
    response.extend_from_slice(format!("{tag} OK FETCH completed\r\n").as_bytes());
    response
}

#[tokio::test]
async fn test_full_retrieve_session() {
    let mut script = b"* OK [CAPABILITY IMAP4rev1] ready\r\n\
        0001 OK LOGIN completed\r\n\
        * 1 EXISTS\r\n\
        0002 OK [READ-WRITE] SELECT completed\r\n"
        .to_vec();
    script.extend_from_slice(&literal_response(1, b"hello world", "0003"));

    let mut client = Client::new(MockStream::new(&script));
    client.read_greeting().await.unwrap();
    client.login("alice", "pa\"ss").await.unwrap();
    client.select("INBOX").await.unwrap();
    client
        .fetch(Selector::Last, FetchItems::FullBody)
        .await
        .unwrap();

    let message = client.next_message().await.unwrap().unwrap();
    assert_eq!(message.data, b"hello world");
    client.complete().await.unwrap();
    client.logout().await.unwrap();
    client.shutdown().await.unwrap();

    let stream = client.into_inner();
    assert!(stream.shut_down);
    assert_eq!(
        stream.sent_data(),
        b"0001 LOGIN \"alice\" \"pa\\\"ss\"\r\n\
          0002 SELECT \"INBOX\"\r\n\
          0003 FETCH * BODY.PEEK[]\r\n\
          0004 LOGOUT\r\n"
    );
}

#[tokio::test]
async fn test_login_failure_is_distinct() {
    let script = b"* OK ready\r\n0001 NO [AUTHENTICATIONFAILED] bad\r\n";
    let mut client = Client::new(MockStream::new(script));

    client.read_greeting().await.unwrap();
    let err = client.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::LoginFailed(_)));
}

#[tokio::test]
async fn test_non_synchronizing_literal() {
    let script = b"* 4 FETCH (BODY[] {5+}\r\nabcde)\r\n0001 OK done\r\n";
    let mut client = Client::new(MockStream::new(script));

    client
        .fetch(Selector::Last, FetchItems::FullBody)
        .await
        .unwrap();
    let message = client.next_message().await.unwrap().unwrap();
    assert_eq!((message.sequence, message.data.as_slice()), (4, &b"abcde"[..]));
}

#[tokio::test]
async fn test_malformed_literal_marker() {
    let script = b"* 4 FETCH (BODY[] {five}\r\n";
    let mut client = Client::new(MockStream::new(script));

    client
        .fetch(Selector::Last, FetchItems::FullBody)
        .await
        .unwrap();
    assert!(matches!(
        client.next_message().await,
        Err(Error::Framing(_))
    ));
}

#[tokio::test]
async fn test_eof_after_literal() {
    let script = b"* 1 FETCH (BODY[] {3}\r\nabc";
    let mut client = Client::new(MockStream::new(script));

    client
        .fetch(Selector::Last, FetchItems::FullBody)
        .await
        .unwrap();
    assert!(matches!(
        client.next_message().await,
        Err(Error::Protocol(_))
    ));
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_literal_of_any_length_is_framed_exactly(
        payload in proptest::collection::vec(any::<u8>(), 0..4096),
    ) {
        let script = literal_response(1, &payload, "0001");
        let message = run(async {
            let mut client = Client::new(MockStream::new(&script));
            client.fetch(Selector::Last, FetchItems::FullBody).await.unwrap();
            let message = client.next_message().await.unwrap();
            client.complete().await.unwrap();
            message
        });
        let message = message.unwrap();
        prop_assert_eq!(message.data, payload);
    }

    #[test]
    fn prop_short_literal_is_io_error(
        payload in proptest::collection::vec(any::<u8>(), 0..512),
        missing in 1usize..64,
    ) {
        let mut script =
            format!("* 1 FETCH (BODY[] {{{}}}\r\n", payload.len() + missing).into_bytes();
        script.extend_from_slice(&payload);
        let result = run(async {
            let mut client = Client::new(MockStream::new(&script));
            client.fetch(Selector::Last, FetchItems::FullBody).await.unwrap();
            client.next_message().await
        });
        prop_assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof));
    }
}
