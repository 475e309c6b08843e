use crate::report::{run_criteria_listing, run_rank, CriteriaArgs, RankCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use placement_dss::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Placement DSS",
    about = "Rank internship and applicant matches from the command line or over HTTP",
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
    /// Rank internships or applicants from JSON profile exports and a weights CSV
    Rank {
        #[command(subcommand)]
        command: RankCommand,
    },
    /// List the registered criteria in evaluation order
    Criteria(CriteriaArgs),
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
        Command::Rank { command } => run_rank(command),
        Command::Criteria(args) => run_criteria_listing(args),
    }
}
