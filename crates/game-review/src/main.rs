//! Game review CLI
//!
//! Reviews every PGN file in the input folder with Stockfish and writes
//! annotated games plus one report per selected player.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use game_review::{runner, ReviewConfig};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, env = "REVIEW_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Override the input folder from the config
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the output folder from the config
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env before the config so STOCKFISH_PATH can come from it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = ReviewConfig::load(&cli.config)?;
    if let Some(input) = cli.input {
        config.input_folder = input;
    }
    if let Some(output) = cli.output {
        config.output_folder = output;
    }

    info!(
        config = %cli.config.display(),
        input = %config.input_folder.display(),
        output = %config.output_folder.display(),
        depth = config.engine.depth,
        "Starting review"
    );

    let summary = runner::run(&config).await?;
    info!(
        games_analyzed = summary.games_analyzed,
        games_skipped = summary.games_skipped,
        "Review finished"
    );
    Ok(())
}
