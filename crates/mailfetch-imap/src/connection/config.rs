//! Settings for the connect step.

use std::fmt;
use std::time::Duration;

/// Bound on resolution, TCP connect and TLS handshake together.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the TCP stream is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Cleartext on the `imap` port (143).
    #[default]
    Plain,
    /// TLS from the first byte on the `imaps` port (993).
    Implicit,
}

impl Security {
    /// Selects [`Security::Implicit`] when `tls` is set.
    #[must_use]
    pub const fn from_tls_flag(tls: bool) -> Self {
        if tls { Self::Implicit } else { Self::Plain }
    }

    /// Service port used when none is configured.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Plain => 143,
            Self::Implicit => 993,
        }
    }
}

/// Where and how to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host name, also used for TLS server name verification.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Transport security.
    pub security: Security,
    /// Bound on the whole connect step.
    pub connect_timeout: Duration,
}

impl Config {
    /// Cleartext on port 143 with the default timeout.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self::builder(host).build()
    }

    /// Starts a builder for `host`.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            host: host.into(),
            port: None,
            security: Security::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)?;
        if self.security == Security::Implicit {
            f.write_str(" (tls)")?;
        }
        Ok(())
    }
}

/// Builder for [`Config`]. The port follows the security mode unless set.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    security: Security,
    connect_timeout: Duration,
}

impl ConfigBuilder {
    /// Overrides the port; `None` keeps the security mode's default.
    #[must_use]
    pub const fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Sets the security mode.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Finishes the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        let port = match self.port {
            Some(port) => port,
            None => self.security.default_port(),
        };
        Config {
            host: self.host,
            port,
            security: self.security,
            connect_timeout: self.connect_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_defaults() {
        let config = Config::new("mail.example.org");
        assert_eq!(
            config,
            Config {
                host: "mail.example.org".to_string(),
                port: 143,
                security: Security::Plain,
                connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            }
        );
        assert_eq!(config.to_string(), "mail.example.org:143");
    }

    #[test]
    fn test_tls_flag_picks_imaps_port() {
        let config = Config::builder("mail.example.org")
            .security(Security::from_tls_flag(true))
            .build();
        assert_eq!(config.port, 993);
        assert_eq!(config.to_string(), "mail.example.org:993 (tls)");
        assert_eq!(Security::from_tls_flag(false), Security::Plain);
    }

    #[test]
    fn test_port_override() {
        let config = Config::builder("localhost")
            .security(Security::Implicit)
            .port(Some(10993))
            .connect_timeout(Duration::from_secs(3))
            .build();
        assert_eq!(config.port, 10993);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));

        let config = Config::builder("localhost").port(None).build();
        assert_eq!(config.port, 143);
    }
}
