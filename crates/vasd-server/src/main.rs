//! Daemon entry point.
//!
//! Thin launcher: parse arguments, wire the collaborators, then either
//! run the network loop alone or alongside the manual injection REPL.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vasd_core::{MemoryStore, Sequencer, TransactionStore};
use vasd_server::config::Config;
use vasd_server::error::ServerError;
use vasd_server::ingest::Ingest;
use vasd_server::manual;
use vasd_server::pipeline::Pipeline;
use vasd_server::registry::LaneRegistry;
use vasd_server::snapshot::SnapshotWriter;
use vasd_server::store::RedbStore;

/// Radar-to-display pipeline daemon.
#[derive(Debug, Parser)]
#[command(name = "vasd-server", version, about)]
struct Args {
    /// Path of the JSON configuration file (created with defaults if
    /// missing).
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Path of the transaction database.
    #[arg(long, default_value = "vasd.redb")]
    database: PathBuf,

    /// Path of the snapshot artifact the presentation API reads.
    #[arg(long, default_value = "latest.json")]
    snapshot: PathBuf,

    /// Also accept lane/speed pairs interactively on stdin.
    #[arg(long)]
    manual: bool,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = Config::load_or_init(&args.config)?;
    let registry = LaneRegistry::from_config(&config);
    for (lane, endpoint) in registry.entries() {
        info!(lane, %endpoint, "display registered");
    }

    // A store that cannot be opened degrades to memory: readings are
    // still displayed and numbered, only durability is lost.
    let store: Arc<dyn TransactionStore> = match RedbStore::open(&args.database) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            warn!(%error, "transaction store unavailable, continuing in memory");
            Arc::new(MemoryStore::new())
        },
    };

    let last_txn = match store.last_txn_no().await {
        Ok(last_txn) => last_txn,
        Err(error) => {
            warn!(%error, "could not read last transaction number, starting from 0");
            0
        },
    };
    info!(last_txn, "sequencer seeded");

    let pipeline = Pipeline::new(
        registry,
        Sequencer::new(last_txn),
        store,
        SnapshotWriter::new(&args.snapshot),
    );

    let bind_addr = config.radar_bind_addr();
    if args.manual {
        // The REPL stays usable even when the radar socket cannot bind.
        match Ingest::bind(bind_addr).await {
            Ok(ingest) => {
                let network_pipeline = Arc::clone(&pipeline);
                tokio::spawn(async move {
                    ingest.run(network_pipeline).await;
                });
            },
            Err(error) => error!(%error, "radar ingestion disabled"),
        }
        manual::run(pipeline).await?;
        Ok(())
    } else {
        let ingest = Ingest::bind(bind_addr).await?;
        ingest.run(pipeline).await;
        Ok(())
    }
}
