//! landmap: command-line access to the Landmap registry and viewport.
//!
//! Records are read from JSON files exported from an event store, so every
//! command runs offline.

mod commands;
mod config;
mod store;

use std::path::PathBuf;

use clap::Parser;
use landmap_registry::{unix_now, ClaimAttributes};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::{Command, RenderOptions};
use config::ViewerConfig;
use store::FileStore;

#[derive(Parser)]
#[command(name = "landmap")]
#[command(about = "Locate identities, encode land claims and render Landmap frames")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "landmap.toml", env = "LANDMAP_CONFIG")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "landmap=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Locate { keys } => {
            for line in commands::locate(&keys) {
                println!("{line}");
            }
        }
        Command::Validate { key, x, y } => {
            commands::validate(&key, x, y)?;
            println!("valid");
        }
        Command::Claim {
            key,
            title,
            description,
            color,
            claimed_at,
            now,
        } => {
            let attrs = ClaimAttributes {
                title,
                description,
                color,
            };
            let record = commands::claim(&key, &attrs, claimed_at, now.unwrap_or_else(unix_now));
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Decode { file, owner } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let records = store::read_records(&content)?;
            let claims = commands::decode_claims(&records, owner.as_ref());
            tracing::info!(records = records.len(), valid = claims.len(), "decoded claims");
            println!("{}", serde_json::to_string_pretty(&claims)?);
        }
        Command::Render {
            profiles,
            claims,
            current,
            width,
            height,
            zoom,
            pointer,
        } => {
            let mut config = ViewerConfig::load(&cli.config)?;

            // Apply CLI overrides
            if let Some(width) = width {
                config.viewport.width = width;
            }
            if let Some(height) = height {
                config.viewport.height = height;
            }
            if let Some(zoom) = zoom {
                config.initial_zoom = zoom;
            }

            let store = FileStore::new(profiles, claims);
            let options = RenderOptions {
                config,
                current,
                pointer,
            };
            let frame = commands::render(&store, &options).await?;
            println!("{}", serde_json::to_string_pretty(&frame)?);
        }
    }

    Ok(())
}
