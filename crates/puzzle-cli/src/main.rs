//! Puzzle image CLI: validate, upload and remove puzzle images.
//!
//! Storage is configured from the environment (STORAGE_BACKEND, STORAGE_BUCKET,
//! S3_REGION, ...); see `puzzle_core::Config`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use puzzle_cli::{error_body, guess_content_type, init_tracing};
use puzzle_core::{CandidateFile, Config, ImageReference};
use puzzle_images::{ImageError, ImageManager};
use puzzle_storage::create_storage;
use serde::Serialize;
use serde_json::json;

#[derive(Parser)]
#[command(name = "puzzle-images", about = "Puzzle image storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file against the image rules without uploading it
    Validate {
        /// Path to the image file
        file: PathBuf,
        /// Media type to declare (guessed from the extension by default)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Upload an image and print its reference
    Upload {
        /// Path to the image file
        file: PathBuf,
        /// Owner the image is stored under
        #[arg(long)]
        owner: String,
        /// Media type to declare (guessed from the extension by default)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Remove an uploaded image
    #[command(group(ArgGroup::new("target").required(true).args(["key", "url"])))]
    Remove {
        /// Storage key of the image
        #[arg(long)]
        key: Option<String>,
        /// Public URL of the image
        #[arg(long)]
        url: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn read_candidate(
    file: &Path,
    content_type: Option<String>,
) -> anyhow::Result<CandidateFile> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let content_type = content_type.unwrap_or_else(|| guess_content_type(file).to_string());
    Ok(CandidateFile::new(name, content_type, data))
}

fn report_failure(err: &ImageError) -> anyhow::Result<ExitCode> {
    print_json(&error_body(err))?;
    Ok(ExitCode::FAILURE)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load storage configuration")?;
    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    let manager = ImageManager::from_config(storage, &config);

    match cli.command {
        Commands::Validate { file, content_type } => {
            let candidate = read_candidate(&file, content_type).await?;
            let result = manager.validate(Some(&candidate));
            print_json(&json!({
                "valid": result.is_valid(),
                "reason": result.reason(),
                "content_type": candidate.content_type,
                "size_bytes": candidate.size,
            }))?;
            if !result.is_valid() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Upload {
            file,
            owner,
            content_type,
        } => {
            let candidate = read_candidate(&file, content_type).await?;
            match manager.upload(&candidate, &owner).await {
                Ok(reference) => print_json(&reference)?,
                Err(e) => return report_failure(&e),
            }
        }
        Commands::Remove { key, url } => {
            let result = if let Some(key) = key {
                let public_url = manager.storage().public_url(&key);
                manager.remove(&ImageReference::new(key, public_url)).await
            } else if let Some(url) = url {
                manager.remove_url(&url).await
            } else {
                anyhow::bail!("Pass --key or --url");
            };
            match result {
                Ok(()) => print_json(&json!({ "success": true }))?,
                Err(e) => return report_failure(&e),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
