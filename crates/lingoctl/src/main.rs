//! Lingo Control - terminal front end for Lingo

use clap::Parser;
use lingo_common::LingoError;
use lingoctl::Cli;
use owo_colors::OwoColorize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = lingoctl::run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        let code = e.downcast_ref::<LingoError>().map(LingoError::code).unwrap_or(1);
        std::process::exit(code);
    }
}
