use std::process;

use bee_lang::cli::{Cli, CliHandler, ExitStatus};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            let status = if error.use_stderr() {
                ExitStatus::Usage
            } else {
                ExitStatus::Success
            };
            process::exit(status.code());
        }
    };

    init_logging(cli.trace);

    let handler = match CliHandler::new(&cli) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(ExitStatus::Usage.code());
        }
    };

    match handler.handle(&cli) {
        Ok(status) => process::exit(status.code()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(ExitStatus::IoError.code());
        }
    }
}

/// Log to stderr, filtered by BEE_LOG (default `warn`)
fn init_logging(trace: bool) {
    // --trace output is emitted at trace level, so let it through unless BEE_LOG says otherwise
    let default = if trace { "warn,bee=trace" } else { "warn" };
    let filter = EnvFilter::try_from_env("BEE_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
