//! Binary entrypoint for the meme frame.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rust_meme_frame::app::{self, RenderRequest};
use rust_meme_frame::config::Configuration;
use rust_meme_frame::speech::TracingSink;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(
    name = "rust-meme-frame",
    about = "Caption an image on a fixed canvas, meme style"
)]
struct Cli {
    /// Path to YAML config file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source image to place on the canvas
    #[arg(short, long, value_name = "FILE")]
    image: PathBuf,

    /// Top caption text
    #[arg(long, value_name = "TEXT", default_value = "")]
    top: String,

    /// Bottom caption text
    #[arg(long, value_name = "TEXT", default_value = "")]
    bottom: String,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE", default_value = "meme.png")]
    out: PathBuf,

    /// Queue the captions as speech utterances after rendering
    #[arg(long)]
    speak: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rust_meme_frame={}", level).parse().unwrap())
        .add_directive("fontdb=warn".parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = Configuration::load_or_default(cli.config.as_deref())?;

    let request = RenderRequest {
        image: cli.image,
        top: cli.top,
        bottom: cli.bottom,
        speak: cli.speak,
    };
    let canvas = app::run(&cfg, request, Arc::new(TracingSink)).await?;

    canvas
        .save(&cli.out)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    info!(out = %cli.out.display(), "meme written");
    Ok(())
}
