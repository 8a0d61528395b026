//! Encounter tracker client binary.
//!
//! Composition root: loads `.env`, sets up logging, loads the catalog and
//! tracker configuration, builds the runtime, replays an encounter script
//! through a [`tracker_runtime::RuntimeHandle`], and prints the final battle
//! state as JSON on stdout.
//!
//! # Examples
//!
//! ```bash
//! # Replay the bundled encounter
//! cargo run -p tracker-client
//!
//! # Replay a custom script and keep snapshots
//! TRACKER_ENABLE_PERSISTENCE=1 TRACKER_SESSION_ID=bridge \
//!     cargo run -p tracker-client -- --script my-encounter.ron
//!
//! # Print the latest snapshot of a saved session
//! TRACKER_ENABLE_PERSISTENCE=1 TRACKER_SESSION_ID=bridge \
//!     cargo run -p tracker-client -- --resume
//! ```

mod config;
mod logging;
mod replay;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use tracker_content::{CatalogLoader, ConfigLoader, ScriptLoader};
use tracker_runtime::{CatalogOracleImpl, PersistenceConfig, Runtime};

use crate::config::ClientConfig;

const BUNDLED_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../tracker/content/data");

/// Replays an encounter script against the battle tracker.
#[derive(Parser, Debug)]
#[command(name = "tracker")]
#[command(version, about, long_about = None)]
struct Args {
    /// Catalog of creatures and players (RON)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Encounter script to replay (RON)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Tracker configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Continue from the latest snapshot of the session (needs persistence)
    #[arg(long)]
    resume: bool,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| Path::new(BUNDLED_DATA).join("catalog.ron"))
    }

    fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| Path::new(BUNDLED_DATA).join("tracker.toml"))
    }

    /// Script to replay. A resumed session replays nothing unless a script
    /// is named explicitly.
    fn script_path(&self) -> Option<PathBuf> {
        match (&self.script, self.resume) {
            (Some(path), _) => Some(path.clone()),
            (None, false) => Some(Path::new(BUNDLED_DATA).join("encounter.ron")),
            (None, true) => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let client_config = ClientConfig::from_env();
    let _log_guard = logging::setup_logging(&client_config)?;

    tracing::info!("Starting tracker client");
    tracing::info!("Session ID: {}", client_config.session_id);
    tracing::info!("Persistence: {}", client_config.enable_persistence);

    let templates = CatalogLoader::load(&args.catalog_path())?;
    tracing::info!("Catalog loaded: {} entries", templates.len());
    let tracker_config = ConfigLoader::load(&args.config_path())?;
    let script = args
        .script_path()
        .map(|path| ScriptLoader::load(&path))
        .transpose()?;

    let mut builder = Runtime::builder()
        .catalog(CatalogOracleImpl::from_templates(templates))
        .tracker_config(tracker_config);
    if client_config.enable_persistence {
        builder = builder
            .enable_persistence(PersistenceConfig::new(
                client_config.session_id.clone(),
                client_config.save_dir.clone(),
            ))
            .restore_latest(args.resume);
    } else if args.resume {
        tracing::warn!("--resume ignored: persistence is disabled");
    }

    let runtime = builder.build().await?;
    let handle = runtime.handle();

    if let Some(script) = &script {
        let summary = replay::replay(&handle, script)
            .await
            .context("encounter replay failed")?;
        tracing::info!(
            applied = summary.applied,
            rejected = summary.rejected,
            "Encounter replayed"
        );
    }

    let state = handle.query_state().await?;
    drop(handle);
    runtime.shutdown().await?;

    let json = if args.compact {
        serde_json::to_string(&state)?
    } else {
        serde_json::to_string_pretty(&state)?
    };
    println!("{}", json);

    tracing::info!("Client shutdown complete");
    Ok(())
}
