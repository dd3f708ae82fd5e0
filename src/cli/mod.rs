//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod background;
mod render;
mod session;
mod status;
mod toggle;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::CliOverrides;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Squad tokens - decorate tabletop tokens with a tiled squad frame
#[derive(Parser)]
#[command(name = "squad-token")]
#[command(about = "Squad tokens - tile a token's icon 2x2 over a background frame")]
#[command(version)]
pub struct Cli {
    /// Path to squad.toml (default: search upwards from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// World document to use instead of the configured one
    #[arg(long, global = true)]
    pub world: Option<PathBuf>,

    /// Directory that host-style asset paths resolve against
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Toggle squad membership of one or more actors
    Toggle {
        /// Actor ids to toggle
        #[arg(required = true)]
        actors: Vec<String>,
    },

    /// Set the background frame image
    #[command(name = "set-background")]
    SetBackground {
        /// Image path (host-style paths resolve against the assets root)
        path: String,
    },

    /// Pick the background frame image interactively
    #[command(name = "select-background")]
    SelectBackground {
        /// Directory to browse first
        #[arg(long)]
        initial: Option<String>,
    },

    /// Run a refresh pass and write every token's displayed image to PNG
    Render {
        /// Output directory
        #[arg(short, long, default_value = "squad-out")]
        out: PathBuf,
    },

    /// Show actors, tokens and the current background
    Status,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    // A second init (e.g. in tests) is harmless
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to start runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides { world: cli.world.clone(), assets: cli.assets.clone() };
    let session = match session::Session::open(cli.config.as_deref(), &overrides) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    runtime.block_on(async {
        match cli.command {
            Commands::Toggle { actors } => toggle::run_toggle(&session, &actors),
            Commands::SetBackground { path } => background::run_set_background(&session, &path).await,
            Commands::SelectBackground { initial } => {
                background::run_select_background(&session, initial.as_deref()).await
            }
            Commands::Render { out } => render::run_render(&session, &out).await,
            Commands::Status => status::run_status(&session).await,
        }
    })
}
