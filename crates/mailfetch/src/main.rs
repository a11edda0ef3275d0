//! `mailfetch` - fetch, summarise and list mail from an IMAP server.
//!
//! Command output goes to stdout, logs go to stderr, and the exit status
//! names the failure family.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::process::ExitCode;

use clap::Parser;
use mailfetch_core::{Error, run};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

const VERBOSE_FILTER: &str =
    "warn,mailfetch=debug,mailfetch_core=debug,mailfetch_imap=debug,mailfetch_mime=debug";

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Usage errors exit 1; help and version succeed.
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);
    info!(command = ?cli.command, server = %cli.server_name, "starting mailfetch");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => return report(&Error::Io(err)),
    };

    match runtime.block_on(execute(&cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { VERBOSE_FILTER } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn execute(cli: &Cli) -> mailfetch_core::Result<()> {
    let request = cli.request();
    request.validate()?;
    let config = cli.connect_config()?;

    let stream = mailfetch_imap::connection::connect(&config)
        .await
        .map_err(Error::connection)?;
    info!(%config, "connected");

    let mut stdout = tokio::io::stdout();
    run(stream, &request, &mut stdout).await
}

fn report(err: &Error) -> ExitCode {
    tracing::error!(kind = ?err.kind(), error = %err, "mailfetch failed");
    println!("{}", err.user_message());
    ExitCode::from(err.exit_code())
}
