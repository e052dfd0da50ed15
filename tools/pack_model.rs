//! Model Artifact Packer
//!
//! Compresses a JSON model artifact with gzip and checks that the service's
//! loader accepts the result.

use anyhow::{Context, Result};
use clap::Parser;
use restaurant_rating::models::loader::{compress_artifact, ModelLoader};
use restaurant_rating::models::predictor::Predictor;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pack_model", about = "Compress and verify a rating model artifact")]
struct Args {
    /// JSON model artifact to compress
    #[arg(short, long)]
    input: PathBuf,

    /// Destination for the gzip-compressed artifact
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("restaurant_rating=info".parse()?)
                .add_directive("pack_model=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let json = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let compressed = compress_artifact(&json).context("Failed to compress artifact")?;
    std::fs::write(&args.output, &compressed)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        raw_bytes = json.len(),
        compressed_bytes = compressed.len(),
        "Artifact compressed"
    );

    let model = ModelLoader::new()
        .load_model(&args.output)
        .context("Compressed artifact was rejected by the loader")?;

    info!(
        model = %model.name,
        version = %model.version,
        kind = model.model.kind(),
        trees = model.model.tree_count(),
        "Artifact verified"
    );

    Ok(())
}
