//! Command-line runner for the zoo simulation.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use zoo_core::SimConfig;
use zoo_world::{FileStore, TextRenderer, ZooBuilder};

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn-based zoo simulation")]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the turn cap (0 runs until no animal is left)
    #[arg(long)]
    turns: Option<u64>,

    /// Directory for entity snapshots
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Do not draw the grid each turn
    #[arg(long)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn load_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            SimConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(turns) = cli.turns {
        config.max_turns = turns;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_logging(cli.json_logs)?;

    let config = load_config(&cli)?;
    info!(
        seed = config.seed,
        height = config.world.height,
        width = config.world.width,
        max_turns = config.max_turns,
        "Configuration loaded"
    );

    let mut builder = ZooBuilder::new(config);
    if let Some(dir) = &cli.save_dir {
        builder = builder.with_persistence(FileStore::new(dir)?);
    }
    if !cli.quiet {
        builder = builder.with_renderer(TextRenderer::new(std::io::stdout()));
    }
    let mut zoo = builder.build()?;

    let result = zoo.run();
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
