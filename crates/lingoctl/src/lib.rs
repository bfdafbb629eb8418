//! Lingoctl library - exposes the CLI pieces for integration tests

pub mod cli;
pub mod commands;
pub mod display;
pub mod logging;

pub use cli::{Cli, Commands};

use anyhow::Result;
use lingo_common::{AppContext, LingoConfig};

/// Load config, set up logging and the app context, then run the command.
/// Flag lookups need none of that and return early.
pub async fn run(cli: Cli) -> Result<()> {
    if let Commands::Flag { language } = &cli.command {
        println!("{}", display::render_flag(language));
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(LingoConfig::default_path);
    let config = LingoConfig::load(&config_path)?;
    logging::init(&config.log.level);

    let ctx = AppContext::build(config)?;
    commands::run(&ctx, cli.command).await
}
