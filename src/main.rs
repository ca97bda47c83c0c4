//! Glide - soft navigation engine, headless driver.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use tokio::task::LocalSet;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    glide::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Replay { args } => {
            // Navigations are local tasks: one thread, one LocalSet
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            LocalSet::new().block_on(&runtime, cli::replay::run_replay(&cli, args))
        }
        Commands::Extract { args } => cli::extract::run_extract(&cli, args),
    }
}
