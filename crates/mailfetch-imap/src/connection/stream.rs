//! The connect step: resolution, TCP, optional TLS.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use super::config::{Config, Security};
use crate::{Error, Result};

/// A connected transport, cleartext or TLS.
///
/// Shutting it down sends TLS `close_notify` before closing the write half.
pub enum ImapStream {
    /// Cleartext TCP.
    Plain(TcpStream),
    /// TLS over TCP, boxed to keep the enum small.
    Tls(Box<TlsStream<TcpStream>>),
}

impl ImapStream {
    /// Returns true for the TLS variant.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    /// Address of the connected server.
    ///
    /// # Errors
    ///
    /// Fails if the socket is no longer connected.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            Self::Plain(tcp) => tcp.peer_addr(),
            Self::Tls(tls) => tls.get_ref().0.peer_addr(),
        }
    }
}

impl std::fmt::Debug for ImapStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImapStream")
            .field("tls", &self.is_tls())
            .field("peer", &self.peer_addr().ok())
            .finish()
    }
}

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(tcp) => Pin::new(tcp).poll_read(cx, buf),
            Self::Tls(tls) => Pin::new(tls).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(tcp) => Pin::new(tcp).poll_write(cx, buf),
            Self::Tls(tls) => Pin::new(tls).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(tcp) => Pin::new(tcp).poll_flush(cx),
            Self::Tls(tls) => Pin::new(tls).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(tcp) => Pin::new(tcp).poll_shutdown(cx),
            Self::Tls(tls) => Pin::new(tls).poll_shutdown(cx),
        }
    }
}

/// TLS client connector trusting the Mozilla root set from `webpki-roots`.
#[must_use]
pub fn tls_connector() -> TlsConnector {
    let roots = rustls::RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

/// Connects to the configured server.
///
/// Resolved IPv6 addresses are tried before IPv4 ones and the first address
/// that accepts wins. [`Security::Implicit`] then runs a TLS handshake that
/// verifies the certificate against `config.host`. Everything is bounded by
/// [`Config::connect_timeout`].
///
/// # Errors
///
/// [`Error::Resolve`], [`Error::ConnectTimeout`], [`Error::InvalidDnsName`]
/// or [`Error::Io`] for refused connections and failed handshakes.
pub async fn connect(config: &Config) -> Result<ImapStream> {
    tracing::debug!(%config, "connecting");
    tokio::time::timeout(config.connect_timeout, establish(config))
        .await
        .map_err(|_| Error::ConnectTimeout(config.connect_timeout))?
}

async fn establish(config: &Config) -> Result<ImapStream> {
    let tcp = connect_tcp(&config.host, config.port).await?;
    if config.security == Security::Plain {
        return Ok(ImapStream::Plain(tcp));
    }

    let server_name = ServerName::try_from(config.host.clone())?;
    let tls = tls_connector().connect(server_name, tcp).await?;
    tracing::debug!(host = %config.host, "TLS established");
    Ok(ImapStream::Tls(Box::new(tls)))
}

async fn connect_tcp(host: &str, port: u16) -> Result<TcpStream> {
    let resolved = tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| Error::Resolve(format!("{host}: {e}")))?;

    let mut last_error = None;
    for addr in prefer_ipv6(resolved.collect()) {
        match TcpStream::connect(addr).await {
            Ok(tcp) => {
                tracing::debug!(%addr, "TCP connected");
                return Ok(tcp);
            }
            Err(e) => {
                tracing::warn!(%addr, error = %e, "connect failed, trying next address");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.map_or_else(|| Error::Resolve(format!("{host}: no addresses")), Error::Io))
}

/// IPv6 first; resolver order is kept within each family.
fn prefer_ipv6(mut addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
    addrs.sort_by_key(SocketAddr::is_ipv4);
    addrs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::time::Duration;

    #[test]
    fn test_prefer_ipv6_is_stable() {
        let addrs: Vec<SocketAddr> = [
            "192.0.2.1:143",
            "[2001:db8::1]:143",
            "192.0.2.2:143",
            "[2001:db8::2]:143",
        ]
        .iter()
        .map(|a| a.parse().unwrap())
        .collect();

        let ordered: Vec<String> = prefer_ipv6(addrs).iter().map(ToString::to_string).collect();
        assert_eq!(
            ordered,
            [
                "[2001:db8::1]:143",
                "[2001:db8::2]:143",
                "192.0.2.1:143",
                "192.0.2.2:143"
            ]
        );
    }

    #[tokio::test]
    async fn test_connect_plain_to_local_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let config = Config::builder("127.0.0.1").port(Some(port)).build();
        let stream = connect(&config).await.unwrap();
        assert!(!stream.is_tls());
        assert_eq!(stream.peer_addr().unwrap().port(), port);
    }

    #[tokio::test]
    async fn test_connect_unresolvable_host() {
        let config = Config::builder("host.invalid")
            .connect_timeout(Duration::from_secs(5))
            .build();
        assert!(matches!(
            connect(&config).await,
            Err(Error::Resolve(_) | Error::ConnectTimeout(_))
        ));
    }
}
