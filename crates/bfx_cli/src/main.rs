//! bfx - ButterflyFX timeline player CLI
//!
//! Validates scene files, samples single frames and plays scenes through
//! headlessly, printing resolved frames as JSON lines.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::BfxConfig;

#[derive(Parser)]
#[command(name = "bfx", about = "ButterflyFX timeline player", version)]
struct Cli {
    /// Path to a bfx.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a scene and check its structure
    Validate {
        /// Scene JSON file
        scene: PathBuf,
    },

    /// Print the resolved frame at a normalized time
    Sample {
        /// Scene JSON file
        scene: PathBuf,

        /// Normalized time in [0, 1]
        #[arg(long)]
        at: f64,

        /// Pretty-print the frame
        #[arg(long)]
        pretty: bool,
    },

    /// Play a scene from start to end at a fixed frame rate
    Play {
        /// Scene JSON file
        scene: PathBuf,

        /// Frames per second (overrides config)
        #[arg(long)]
        fps: Option<f64>,

        /// Playback speed multiplier (overrides config)
        #[arg(long)]
        speed: Option<f64>,

        /// Only report the summary, not each frame
        #[arg(short, long)]
        quiet: bool,
    },

    /// List markers and the previous/next targets from a position
    Markers {
        /// Scene JSON file
        scene: PathBuf,

        /// Normalized playhead position
        #[arg(long, default_value_t = 0.0)]
        at: f64,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(level: &str, verbose: u8) {
    let level = match verbose {
        0 => level,
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BfxConfig::load_or_default(cli.config.as_deref())?;

    init_logging(&config.logging.level, cli.verbose);

    match cli.command {
        Commands::Validate { scene } => commands::validate(&scene),
        Commands::Sample { scene, at, pretty } => commands::sample(&scene, at, pretty),
        Commands::Play {
            scene,
            fps,
            speed,
            quiet,
        } => commands::play(&scene, config.player_with_overrides(fps, speed), quiet),
        Commands::Markers { scene, at } => {
            commands::markers(&scene, at, config.player.marker_epsilon)
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
