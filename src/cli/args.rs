//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Glide soft navigation engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: glide.toml, searched upward from ROOT)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Drive a headless navigator through a static site
    #[command(visible_alias = "r")]
    Replay {
        #[command(flatten)]
        args: ReplayArgs,
    },

    /// Show what the extractor sees in an HTML file
    #[command(visible_alias = "x")]
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },
}

/// Replay command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ReplayArgs {
    /// Site directory to serve pages from
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Steps to run in order: `<href>` clicks a link, `back` goes back one
    /// entry, `preload:<href>` fetches a page ahead of time
    #[arg(value_name = "STEP")]
    pub steps: Vec<String>,

    /// Page to open first (overrides `[replay] start`)
    #[arg(short, long)]
    pub start: Option<String>,

    /// Artificial response latency in milliseconds (overrides `[replay] latency_ms`)
    #[arg(short, long)]
    pub latency: Option<u64>,

    /// Print lifecycle events as JSON lines
    #[arg(short, long)]
    pub json: bool,
}

/// Extract command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// HTML file to inspect
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Container selector (repeatable; default: `[nav] containers`)
    #[arg(short, long = "container", value_name = "SEL")]
    pub containers: Vec<String>,
}
