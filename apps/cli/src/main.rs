//! chatvault command-line entry point.

mod config;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chatvault_chunk::{collect_parts, merge_chunks, split_file};
use chatvault_gateway::GatewayClient;
use chatvault_manifest::ManifestStore;
use chatvault_uplink::{Downloader, TransferEvent, Uploader};

use config::Config;

#[derive(Parser)]
#[command(
    name = "chatvault",
    version,
    about = "Store large files in a messaging channel's chat history"
)]
struct Cli {
    /// Alternate configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Split a file into fixed-size part files
    Split {
        filepath: PathBuf,
        /// Override the configured chunk size (bytes)
        #[arg(long)]
        chunk_size: Option<u64>,
    },
    /// Merge the part files of a directory back into one file
    Merge { output: PathBuf, parts_dir: PathBuf },
    /// Upload the files of a directory to the configured channel
    Upload {
        /// Directory to upload (defaults to the configured files dir)
        dir: Option<PathBuf>,
    },
    /// List manifest entries with their download indices
    List,
    /// Download one uploaded attachment by manifest index
    Download { index: usize },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load()?,
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli.cmd, config))
}

async fn run(cmd: Cmd, config: Config) -> anyhow::Result<()> {
    match cmd {
        Cmd::Split {
            filepath,
            chunk_size,
        } => {
            let limit = chunk_size.unwrap_or(config.chunk_size);
            let parts = split_file(&filepath, limit)
                .with_context(|| format!("failed to split {}", filepath.display()))?;
            for part in &parts {
                println!("created {}", part.display());
            }
            println!("{} parts written", parts.len());
        }

        Cmd::Merge { output, parts_dir } => {
            let parts = collect_parts(&parts_dir)
                .with_context(|| format!("failed to list parts in {}", parts_dir.display()))?;
            anyhow::ensure!(
                !parts.is_empty(),
                "no .part files found in {}",
                parts_dir.display()
            );
            merge_chunks(&output, &parts)
                .with_context(|| format!("failed to merge into {}", output.display()))?;
            println!("merged {} parts into {}", parts.len(), output.display());
        }

        Cmd::Upload { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.files_dir));
            let client = gateway_client(&config)?;
            let store = ManifestStore::new(&config.manifest_path);
            let uploader = Uploader::new(&client, &config.channel, config.chunk_size);

            let (events_tx, mut events_rx) = tokio::sync::mpsc::channel(256);
            let printer = tokio::spawn(async move {
                while let Some(event) = events_rx.recv().await {
                    match event {
                        TransferEvent::Started { files, total_bytes } => {
                            println!("uploading {files} files ({total_bytes} bytes)");
                        }
                        TransferEvent::Progress {
                            filename,
                            transferred,
                            total_bytes,
                        } => {
                            println!("  {filename}: {transferred}/{total_bytes} bytes");
                        }
                        TransferEvent::Sent {
                            filename,
                            message_id,
                        } => {
                            println!("  sent {filename} (message {message_id})");
                        }
                        TransferEvent::Completed { uploaded } => {
                            println!("{uploaded} uploads recorded");
                        }
                    }
                }
            });

            let result = uploader.upload_dir(&dir, &store, &events_tx).await;
            drop(events_tx);
            let _ = printer.await;

            let entries = result?;
            println!(
                "manifest updated: {} ({} new entries)",
                store.path().display(),
                entries.len()
            );
        }

        Cmd::List => {
            let store = ManifestStore::new(&config.manifest_path);
            let entries = store.load()?;
            if entries.is_empty() {
                println!("manifest is empty");
            }
            for (index, entry) in entries.iter().enumerate() {
                println!(
                    "{index:4}  {:>12}  {:>12}  {}  {}",
                    entry.message_id,
                    entry.size,
                    entry.date.format("%Y-%m-%d %H:%M:%S"),
                    entry.filename
                );
            }
        }

        Cmd::Download { index } => {
            let client = gateway_client(&config)?;
            let store = ManifestStore::new(&config.manifest_path);
            let downloader = Downloader::new(&client, &config.channel);
            let saved = downloader
                .fetch_entry(&store, index, Path::new(&config.downloads_dir))
                .await?;
            println!("saved {}", saved.display());
        }
    }

    Ok(())
}

fn gateway_client(config: &Config) -> anyhow::Result<GatewayClient> {
    anyhow::ensure!(
        !config.gateway_url.is_empty(),
        "gateway_url is not configured"
    );
    anyhow::ensure!(!config.channel.is_empty(), "channel is not configured");
    Ok(GatewayClient::new(&config.gateway_url, &config.gateway_token))
}
