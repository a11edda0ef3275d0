//! Command line arguments.

use clap::{Parser, ValueEnum};
use mailfetch_core::{Error, Operation, Request};
use mailfetch_imap::{Config, Security};

/// Fetch mail from an IMAP server.
#[derive(Parser)]
#[command(name = "mailfetch", version, max_term_width = 80)]
pub struct Cli {
    /// What to do with the selected folder.
    #[arg(value_enum)]
    pub command: CommandArg,

    /// Host name of the IMAP server.
    pub server_name: String,

    /// The user name to log in as.
    #[arg(short, long, env = "MAILFETCH_USERNAME", default_value = "")]
    pub username: String,

    /// The password to log in with.
    #[arg(
        short,
        long,
        env = "MAILFETCH_PASSWORD",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub password: String,

    /// Folder to select [default: INBOX]
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Message sequence number, or `*` for the newest message [default: *]
    #[arg(short = 'n', long)]
    pub message_num: Option<String>,

    /// Connect with TLS (implicit, port 993 unless `--port` is given).
    #[arg(short = 't', long)]
    pub use_tls: bool,

    /// The port to connect to [default: 143, or 993 with --use-tls]
    #[arg(long)]
    pub port: Option<u16>,

    /// Log the IMAP conversation to standard error.
    #[arg(short, long)]
    pub verbose: bool,
}

/// The four commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CommandArg {
    /// Print the raw message.
    Retrieve,
    /// Print From, To, Date and Subject.
    Parse,
    /// Print the text/plain part of a multipart/alternative message.
    Mime,
    /// Print the subject of every message in the folder.
    List,
}

impl From<CommandArg> for Operation {
    fn from(command: CommandArg) -> Self {
        match command {
            CommandArg::Retrieve => Self::Retrieve,
            CommandArg::Parse => Self::Parse,
            CommandArg::Mime => Self::Mime,
            CommandArg::List => Self::List,
        }
    }
}

impl Cli {
    /// Builds the session request.
    pub fn request(&self) -> Request {
        Request {
            operation: self.command.into(),
            username: self.username.clone(),
            password: self.password.clone(),
            folder: self.folder.clone(),
            message: self.message_num.clone(),
        }
    }

    /// Builds the transport configuration.
    pub fn connect_config(&self) -> Result<Config, Error> {
        if self.server_name.trim().is_empty() {
            return Err(Error::Config("Server name not specified".to_string()));
        }

        Ok(Config::builder(self.server_name.trim())
            .security(Security::from_tls_flag(self.use_tls))
            .port(self.port)
            .build())
    }
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("command", &self.command)
            .field("server_name", &self.server_name)
            .field("username", &self.username)
            .field("folder", &self.folder)
            .field("message_num", &self.message_num)
            .field("use_tls", &self.use_tls)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
