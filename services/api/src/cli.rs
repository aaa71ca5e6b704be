use crate::report::{run_position_candidates, PositionCandidatesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use talent_ats::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Talent ATS",
    about = "Run the candidate pipeline service or inspect seeded pipelines from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect positions and their candidate pipelines
    Positions {
        #[command(subcommand)]
        command: PositionsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum PositionsCommand {
    /// Print the candidates applying to a position with their stage and average score
    Candidates(PositionCandidatesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory of CSV seed tables used to hydrate the store
    #[arg(long)]
    pub(crate) seed_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Positions {
            command: PositionsCommand::Candidates(args),
        } => run_position_candidates(args),
    }
}
