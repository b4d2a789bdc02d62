use crate::commands::{run_coverage, run_match, CoverageArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exchange_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Exchange Match",
    about = "Rank AU/NZ crypto exchanges against quiz answers from the command line",
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
    /// Score and rank the catalog for one set of quiz answers
    Match(MatchArgs),
    /// Sweep every answer combination and summarise provider coverage
    Coverage(CoverageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Coverage(args) => run_coverage(args),
    }
}
