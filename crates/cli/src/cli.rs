use clap::Parser as _;

use crate::{
    commands::{run_command, Cli},
    logging::init_tracing,
};

/// Run the Docket CLI application.
///
/// Parses command-line arguments, initializes tracing, and executes the requested command.
pub async fn run() -> docket::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.json, cli.verbose);

    run_command(cli).await
}
