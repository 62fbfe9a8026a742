//! Jimbruz — the introverted Snow Beast, in your terminal.
//!
//! Main entry point for the Jimbruz CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jimbruz::input::Lines;
use jimbruz::{repl, setup};
use jimbruz_core::config::JimbruzConfig;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Jimbruz — a shy Snow Beast that remembers you
#[derive(Parser)]
#[command(name = "jimbruz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "JIMBRUZ_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for memories.json and session.log (overrides config)
    #[arg(long, env = "JIMBRUZ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Never call the chat collaborator, even if an API key is set
    #[arg(long)]
    offline: bool,

    /// Seed the pet's random choices for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before parsing so `.env` can supply `JIMBRUZ_*` flags too.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => JimbruzConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => JimbruzConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }
    if cli.seed.is_some() {
        config.pet.rng_seed = cli.seed;
    }
    config.validate().context("invalid configuration")?;

    init_tracing(&config.general.log_level, cli.verbose);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Could not parse .env"),
    }

    let mut companion = setup::companion(&config, cli.offline)
        .with_context(|| format!("opening data dir {}", config.storage.data_dir.display()))?;
    info!(
        data_dir = %config.storage.data_dir.display(),
        collaborator = companion.has_collaborator(),
        "Jimbruz summoned"
    );

    let mut input = Lines::stdin().context("starting input reader")?;
    let mut stdout = std::io::stdout();
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    repl::run(&mut companion, &mut input, &mut stdout, shutdown).await?;
    Ok(())
}

/// Logs go to stderr so they never interleave with the conversation on stdout.
fn init_tracing(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("jimbruz=debug,jimbruz_core=debug,jimbruz_llm=debug,warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "jimbruz={level},jimbruz_core={level},jimbruz_llm={level},warn"
            ))
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
