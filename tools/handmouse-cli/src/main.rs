//! handmouse CLI: control the pointer with hand gestures.
//!
//! Usage:
//!   handmouse run [OPTIONS]       Start a live gesture session
//!   handmouse replay <FILE>       Run a recorded landmark session
//!   handmouse check               Check system capabilities
//!   handmouse config [--init]     Show or initialize the config file

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use handmouse_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "handmouse",
    about = "Webcam hand-gesture virtual mouse",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/handmouse/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where hand landmarks come from in a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputSource {
    /// JSON landmark datagrams from an external tracker.
    Udp,
    /// Local webcam through OpenCV, paired with the tracker's datagrams.
    Camera,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a live gesture session
    Run {
        /// One hand does everything (no exit gesture)
        #[arg(long)]
        single_hand: bool,

        /// Landmark input
        #[arg(long, value_enum, default_value = "udp")]
        input: InputSource,

        /// UDP address for landmark datagrams (overrides the config)
        #[arg(long)]
        bind: Option<String>,

        /// Append every emitted action to a JSONL file
        #[arg(long)]
        log_actions: Option<PathBuf>,

        /// Trace actions instead of moving the real pointer
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a recorded landmark session (JSONL of frame observations)
    Replay {
        /// Path to the recording
        file: PathBuf,

        /// Use the single-hand interpreter
        #[arg(long)]
        single_hand: bool,

        /// Apply actions to the real pointer instead of printing them
        #[arg(long)]
        apply: bool,

        /// Screen size for printed actions, as WIDTHxHEIGHT
        #[arg(long, default_value = "1920x1080")]
        screen: String,

        /// Deliver frames at their recorded pace
        #[arg(long)]
        realtime: bool,
    },

    /// Check system capabilities
    Check,

    /// Show the effective configuration
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    handmouse_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Run {
            single_hand,
            input,
            bind,
            log_actions,
            dry_run,
        } => commands::run::run(config, single_hand, input, bind, log_actions, dry_run).await,
        Commands::Replay {
            file,
            single_hand,
            apply,
            screen,
            realtime,
        } => commands::replay::run(config, file, single_hand, apply, screen, realtime),
        Commands::Check => commands::check::run(&config),
        Commands::Config { init } => commands::config::run(&config, cli.config, init),
    }
}
