//! testplan - convert JSON API test plans to Postman collections and run
//! them against a live server.

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use testplan::common::logging;
use testplan::{cli, commands::Commands};

#[derive(Parser)]
#[command(name = "testplan", about = "JSON API test plan converter and runner")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    match cli::dispatch(cli.command, cli.config.as_deref()).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", format!("Error: {e}").red());
            std::process::exit(1);
        }
    }
}
