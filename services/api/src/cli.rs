use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use surat_desa::error::AppError;

/// Village letter portal: serve the HTTP API or replay a request end to end.
#[derive(Parser, Debug)]
#[command(name = "surat-desa", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the portal API (runs when no subcommand is given)
    Serve(ServeArgs),
    /// Register a citizen, submit a letter and review it against an in-memory store
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Bind host; takes precedence over APP_HOST
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Bind port; takes precedence over APP_PORT
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    match Cli::parse().command {
        Some(Command::Demo(args)) => run_demo(args),
        Some(Command::Serve(args)) => server::run(args).await,
        None => server::run(ServeArgs::default()).await,
    }
}
