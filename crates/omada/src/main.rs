mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use omada_api::OmadaClient;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        // Target management only touches the config file
        Command::Target(args) => commands::targets::handle_target(args, global).await,
        Command::Targets => commands::targets::list(global),

        // Everything else runs inside one controller session
        cmd => {
            let (name, target) = config::resolve_target(global)?;
            let client = target.to_client()?;
            tracing::debug!(target = %name, command = ?cmd, "dispatching command");

            client
                .with_session(async move |client: &OmadaClient| {
                    commands::dispatch(cmd, client, &target, global).await
                })
                .await
        }
    }
}
