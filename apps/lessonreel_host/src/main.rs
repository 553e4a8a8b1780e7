//! lessonreel-host: a headless editor session for a hosting surface.
//!
//! Usage:
//!   lessonreel-host [serve] [--viewport-width PX]   Read JSON requests on stdin, one per line
//!   lessonreel-host init-config <PATH>              Write the default editor config
//!
//! Responses are written to stdout, one JSON object per line. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lessonreel_core::logging::init_logging;
use lessonreel_core::EditorConfig;
use tokio::io::BufReader;

mod session;

use session::Session;

const DEFAULT_VIEWPORT_WIDTH: f64 = 1000.0;

#[derive(Parser)]
#[command(
    name = "lessonreel-host",
    about = "Timeline editing engine for short lesson videos",
    version
)]
struct Cli {
    /// Editor config file (JSON). Missing or malformed files fall back to defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-lines requests on stdin
    Serve {
        /// Timeline viewport width used by zoom-to-fit (pixels)
        #[arg(long, default_value_t = DEFAULT_VIEWPORT_WIDTH)]
        viewport_width: f64,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        path: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load_or_default(path),
        None => EditorConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Serve {
        viewport_width: DEFAULT_VIEWPORT_WIDTH,
    }) {
        Commands::Serve { viewport_width } => serve(config, viewport_width).await,
        Commands::InitConfig { path } => {
            EditorConfig::default()
                .save(&path)
                .with_context(|| format!("failed to write config to {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote default config");
            Ok(())
        }
    }
}

async fn serve(config: EditorConfig, viewport_width: f64) -> anyhow::Result<()> {
    tracing::info!(
        width = config.composition.width,
        height = config.composition.height,
        fps = config.composition.fps,
        "Session started"
    );
    let mut session = Session::new(config, viewport_width);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!(
        elements = session.editor().timeline().elements().len(),
        "Input closed, session ended"
    );
    Ok(())
}
