use crate::demo::{run_analytics, run_demo, AnalyticsArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use readiness_ai::config::AppConfig;
use readiness_ai::error::AppError;
use readiness_ai::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "AI Readiness Assessment",
    about = "Serve and demonstrate the adaptive AI-readiness assessment engine",
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
    /// Run one in-memory assessment end to end and print the results
    Demo(DemoArgs),
    /// Import assessment history from CSV and print an analytics snapshot
    Analytics(AnalyticsArgs),
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
        Command::Demo(args) => {
            telemetry::init(&AppConfig::load()?.telemetry)?;
            run_demo(args)
        }
        Command::Analytics(args) => {
            telemetry::init(&AppConfig::load()?.telemetry)?;
            run_analytics(args)
        }
    }
}
