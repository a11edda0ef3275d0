//! End-to-end runs of each command against a scripted server.

use std::io::{self, Cursor};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use mailfetch_core::{ErrorKind, Operation, Request, run};

/// Replays a server script and records everything the client sends.
struct MockServer {
    script: Cursor<Vec<u8>>,
    sent: Vec<u8>,
    shut_down: bool,
}

impl MockServer {
    fn new(script: Vec<u8>) -> Self {
        Self {
            script: Cursor::new(script),
            sent: Vec::new(),
            shut_down: false,
        }
    }

    fn sent(&self) -> String {
        String::from_utf8_lossy(&self.sent).into_owned()
    }
}

impl AsyncRead for MockServer {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let pos = self.script.position() as usize;
        let data = self.script.get_ref();
        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let to_read = (data.len() - pos).min(buf.remaining());
        buf.put_slice(&data[pos..pos + to_read]);
        self.script.set_position((pos + to_read) as u64);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockServer {
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

const PREAMBLE: &[u8] = b"* OK [CAPABILITY IMAP4rev1] ready\r\n\
    0001 OK LOGIN completed\r\n\
    * 2 EXISTS\r\n\
    * 0 RECENT\r\n\
    0002 OK [READ-WRITE] SELECT completed\r\n";

fn request(operation: Operation, message: Option<&str>) -> Request {
    Request {
        operation,
        username: "alice".to_string(),
        password: "secret".to_string(),
        folder: None,
        message: message.map(str::to_string),
    }
}

fn fetch_item(sequence: u32, item: &str, payload: &[u8]) -> Vec<u8> {
    let mut out = format!("* {sequence} FETCH ({item} {{{}}}\r\n", payload.len()).into_bytes();
    out.extend_from_slice(payload);
    out.extend_from_slice(b")\r\n");
    out
}

fn session(responses: &[&[u8]]) -> MockServer {
    let mut script = PREAMBLE.to_vec();
    for response in responses {
        script.extend_from_slice(response);
    }
    MockServer::new(script)
}

#[tokio::test]
async fn test_retrieve_writes_raw_message() {
    let message = b"Subject: hello\r\n\r\nhello world\r\n";
    let mut server = session(&[&fetch_item(2, "BODY[]", message), b"0003 OK FETCH completed\r\n"]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::Retrieve, None), &mut out)
        .await
        .unwrap();

    assert_eq!(out, message);
    assert_eq!(
        server.sent(),
        "0001 LOGIN \"alice\" \"secret\"\r\n\
         0002 SELECT \"INBOX\"\r\n\
         0003 FETCH * BODY.PEEK[]\r\n\
         0004 LOGOUT\r\n"
    );
    assert!(server.shut_down);
}

#[tokio::test]
async fn test_parse_prints_summary() {
    let headers = b"From: Alice <alice@example.com>\r\n\
        To: Bob <bob@example.com>\r\n\
        Date: Mon, 1 Jan 2024 09:00:00 +0000\r\n\
        Subject: Quarterly\r\n numbers\r\n\r\n";
    let mut server = session(&[
        &fetch_item(1, "BODY[HEADER.FIELDS (FROM TO DATE SUBJECT)]", headers),
        b"0003 OK FETCH completed\r\n",
    ]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::Parse, Some("1")), &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "From: Alice <alice@example.com>\n\
         To: Bob <bob@example.com>\n\
         Date: Mon, 1 Jan 2024 09:00:00 +0000\n\
         Subject: Quarterly numbers\n"
    );
    assert!(server.sent().contains(
        "0003 FETCH 1 BODY.PEEK[HEADER.FIELDS (FROM TO DATE SUBJECT)]\r\n"
    ));
}

#[tokio::test]
async fn test_mime_prints_plain_part() {
    let message = b"MIME-Version: 1.0\r\n\
        Content-Type: multipart/alternative; boundary=\"xyz\"\r\n\r\n\
        --xyz\r\nContent-Type: text/html; charset=utf-8\r\n\r\n<p>Hi</p>\r\n\
        --xyz\r\nContent-Type: text/plain; charset=utf-8\r\n\r\nHi\r\n\
        --xyz--\r\n";
    let mut server = session(&[&fetch_item(2, "BODY[]", message), b"0003 OK\r\n"]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::Mime, Some("*")), &mut out)
        .await
        .unwrap();

    assert_eq!(out, b"Hi");
}

#[tokio::test]
async fn test_mime_on_plain_message_is_content_error() {
    let message = b"Content-Type: text/plain\r\n\r\nnot multipart\r\n";
    let mut server = session(&[&fetch_item(2, "BODY[]", message), b"0003 OK\r\n"]);
    let mut out = Vec::new();

    let err = run(&mut server, &request(Operation::Mime, None), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Content);
    assert_eq!(err.exit_code(), 4);
    assert!(out.is_empty());
    assert!(server.sent().ends_with("0004 LOGOUT\r\n"));
}

#[tokio::test]
async fn test_list_prints_each_subject() {
    let mut server = session(&[
        &fetch_item(
            1,
            "FLAGS (\\Seen) BODY[HEADER.FIELDS (SUBJECT)]",
            b"Subject: First\r\n\r\n",
        ),
        &fetch_item(2, "FLAGS () BODY[HEADER.FIELDS (SUBJECT)]", b"\r\n"),
        b"0003 OK FETCH completed\r\n",
    ]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::List, Some("7")), &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "1: First\n2: <No subject>\n");
    assert!(server
        .sent()
        .contains("0003 FETCH 1:* (FLAGS BODY[HEADER.FIELDS (SUBJECT)])\r\n"));
}

#[tokio::test]
async fn test_list_stops_at_empty_literal() {
    let mut server = session(&[
        &fetch_item(1, "BODY[HEADER.FIELDS (SUBJECT)]", b"Subject: a\r\n\r\n"),
        &fetch_item(2, "BODY[HEADER.FIELDS (SUBJECT)]", b""),
        &fetch_item(3, "BODY[HEADER.FIELDS (SUBJECT)]", b"Subject: c\r\n\r\n"),
        b"0003 OK FETCH completed\r\n",
    ]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::List, None), &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "1: a\n");
    assert!(server.sent().ends_with("0004 LOGOUT\r\n"));
}

#[tokio::test]
async fn test_list_of_empty_folder() {
    let mut server = session(&[b"0003 OK FETCH completed\r\n"]);
    let mut out = Vec::new();

    run(&mut server, &request(Operation::List, None), &mut out)
        .await
        .unwrap();

    assert!(out.is_empty());
}

#[tokio::test]
async fn test_list_with_failed_completion() {
    let mut server = session(&[
        &fetch_item(1, "BODY[HEADER.FIELDS (SUBJECT)]", b"Subject: a\r\n\r\n"),
        b"0003 BAD internal error\r\n",
    ]);
    let mut out = Vec::new();

    let err = run(&mut server, &request(Operation::List, None), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_login_failure_still_logs_out() {
    let mut server = MockServer::new(b"* OK ready\r\n0001 NO [AUTHENTICATIONFAILED] nope\r\n".to_vec());
    let mut out = Vec::new();

    let err = run(&mut server, &request(Operation::Retrieve, None), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::LoginFailed);
    assert_eq!(err.user_message(), "Login failure");
    assert_eq!(err.exit_code(), 3);
    assert_eq!(
        server.sent(),
        "0001 LOGIN \"alice\" \"secret\"\r\n0002 LOGOUT\r\n"
    );
    assert!(server.shut_down);
}

#[tokio::test]
async fn test_folder_not_found() {
    let mut server = MockServer::new(
        b"* OK ready\r\n0001 OK\r\n0002 NO [NONEXISTENT] Unknown mailbox\r\n".to_vec(),
    );
    let mut req = request(Operation::Retrieve, None);
    req.folder = Some("Archive/2019".to_string());
    let mut out = Vec::new();

    let err = run(&mut server, &req, &mut out).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FolderNotFound);
    assert_eq!(err.user_message(), "Folder not found");
    assert!(server.sent().contains("0002 SELECT \"Archive/2019\"\r\n"));
    assert!(server.sent().ends_with("0003 LOGOUT\r\n"));
}

#[tokio::test]
async fn test_message_not_found() {
    let mut server = session(&[b"0003 OK FETCH completed\r\n"]);
    let mut out = Vec::new();

    let err = run(&mut server, &request(Operation::Retrieve, Some("99")), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MessageNotFound);
    assert_eq!(err.user_message(), "Message not found");
    assert!(server.sent().contains("0003 FETCH 99 BODY.PEEK[]\r\n"));
    assert!(server.sent().ends_with("0004 LOGOUT\r\n"));
}

#[tokio::test]
async fn test_empty_literal_is_message_not_found() {
    for operation in [Operation::Retrieve, Operation::Parse, Operation::Mime] {
        let mut server = session(&[&fetch_item(2, "BODY[]", b""), b"0003 OK FETCH completed\r\n"]);
        let mut out = Vec::new();

        let err = run(&mut server, &request(operation, None), &mut out)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MessageNotFound, "{operation:?}");
        assert_eq!(err.user_message(), "Message not found");
        assert!(out.is_empty());
        assert!(server.sent().ends_with("0004 LOGOUT\r\n"));
    }
}

#[tokio::test]
async fn test_server_hangs_up_mid_session() {
    let mut server = MockServer::new(b"* OK ready\r\n".to_vec());
    let mut out = Vec::new();

    let err = run(&mut server, &request(Operation::Retrieve, None), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn test_invalid_request_sends_nothing() {
    let mut server = MockServer::new(PREAMBLE.to_vec());
    let mut req = request(Operation::Retrieve, None);
    req.password.clear();
    let mut out = Vec::new();

    let err = run(&mut server, &req, &mut out).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.user_message(), "Password not specified");
    assert!(server.sent.is_empty());
    assert!(!server.shut_down);
}
