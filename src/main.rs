use anyhow::Result;
use clap::Parser;
use cloudinary_offload::cloudinary::CloudinaryClient;
use cloudinary_offload::models::Config;
use cloudinary_offload::offload::{sweep_orphans, CleanupOutcome, Offloader};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "cloudinary-offload")]
#[command(about = "Upload local files to Cloudinary and remove them afterwards")]
struct CliArgs {
    /// Files to upload; each is deleted locally after the attempt.
    #[arg(value_name = "FILE", required_unless_present = "sweep_dir")]
    files: Vec<PathBuf>,

    /// Staging directory to sweep for orphaned files before uploading.
    #[arg(long, value_name = "DIR")]
    sweep_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudinary_offload=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load Cloudinary configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(dir) = &args.sweep_dir {
        match sweep_orphans(dir).await {
            Ok(removed) => info!("Swept {} orphaned file(s) from {}", removed, dir.display()),
            Err(e) => warn!("Orphan sweep of {} failed: {}", dir.display(), e),
        }
    }

    let offloader = Offloader::new(Box::new(CloudinaryClient::new(config)));

    let mut failures = 0usize;
    for file in &args.files {
        match offloader.offload(file).await {
            Ok(receipt) => {
                if let CleanupOutcome::Failed(reason) = &receipt.cleanup {
                    warn!("{} uploaded but not removed locally: {}", file.display(), reason);
                }
                println!("{}", receipt.response.url);
            }
            Err(e) => {
                error!("Offload of {} failed: {}", file.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        error!("{} of {} file(s) failed to offload", failures, args.files.len());
        std::process::exit(1);
    }

    info!("All files offloaded successfully");
    Ok(())
}
