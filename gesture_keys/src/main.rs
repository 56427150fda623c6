//! gesture_keys entry point.

use std::path::PathBuf;

use clap::Parser;
use gesture_keys::app::{run, Source};
use gesture_keys::config::AppConfig;
use gesture_keys::DEFAULT_LOG_FILTER;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gesture_keys", version, about = "Hand-gesture keyboard broadcasting JSON-line events over TCP")]
struct Cli {
    /// Configuration file (default: ./gesture_keys.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to accept event clients on, overriding the configuration
    #[arg(long)]
    listen: Option<String>,

    /// Replay recorded detector output instead of opening the simulator
    #[arg(long, value_name = "FILE", conflicts_with = "camera")]
    replay: Option<PathBuf>,

    /// Track a live camera (requires the `camera` feature)
    #[arg(long)]
    camera: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let mut cfg = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        cfg.listen = listen;
    }

    let source = match (cli.replay, cli.camera) {
        (Some(path), _) => Source::Replay(path),
        (None, true) => Source::Camera,
        (None, false) => Source::Sim,
    };

    info!("gesture_keys v{} starting", env!("CARGO_PKG_VERSION"));
    info!(listen = %cfg.listen, ?source, "configuration");
    run(cfg, source)
}
