use crate::assess::{print_policy, run_assess, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use risk_fusion::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Risk Fusion Engine",
    about = "Score loan applications from document text and serve the assessment API",
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
    /// Assess one or more text documents and print the decision
    Assess(AssessArgs),
    /// Print the effective risk policy as JSON
    Policy,
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
        Command::Assess(args) => run_assess(args).await,
        Command::Policy => print_policy(),
    }
}
