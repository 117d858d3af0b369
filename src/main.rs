//! savehook - prompt hook that snapshots and publishes a working tree.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use savehook::cli::{self, Cli, Commands};
use savehook::Error;

fn main() -> Result<(), Error> {
    // Logs go to stderr; stdout carries the hook response.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("savehook=info")),
        )
        .init();

    let cli = Cli::parse();
    // Resolved per command: the hook must answer even when this fails.
    let project_dir = cli::project_dir(cli.project_dir);

    match cli.command.unwrap_or(Commands::Hook) {
        Commands::Hook => {
            cli::hook::run(project_dir)?;
        }
        Commands::Save { message } => {
            let exit_code = cli::save::run(&project_dir?, &message)?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Commands::Install { command } => {
            cli::install::install(&project_dir?, &command)?;
        }
        Commands::Uninstall => {
            cli::install::uninstall(&project_dir?)?;
        }
        Commands::Config { init } => {
            cli::config::run(&project_dir?, init)?;
        }
    }

    Ok(())
}
