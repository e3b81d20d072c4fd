//! The datagram handling chain.
//!
//! Parser → sequencer → persistence → display dispatch. One [`Pipeline`]
//! is shared by the network ingestion loop and the manual injection
//! path; both feed raw lines through [`Pipeline::handle_line`], so there
//! is exactly one validation and dispatch path in the system.
//!
//! Persistence (store append + snapshot overwrite) runs on its own task:
//! a slow or failing store delays nothing on the display path.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, info, warn};
use vasd_core::{DispatchPlan, Sequencer, SnapshotDoc, Transaction, TransactionStore};
use vasd_proto::Reading;

use crate::registry::LaneRegistry;
use crate::sender;
use crate::snapshot::SnapshotWriter;
use crate::timers::LaneTimerTable;

/// Timestamp layout shared with the radar's optional observedAt field.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Wall-clock receipt time, formatted like the radar's timestamp field.
///
/// Falls back to UTC when the local offset cannot be determined.
#[must_use]
pub fn receipt_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&TIMESTAMP_FORMAT).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Shared state for the handling chain.
pub struct Pipeline {
    registry: LaneRegistry,
    sequencer: Mutex<Sequencer>,
    store: Arc<dyn TransactionStore>,
    snapshot: Arc<SnapshotWriter>,
    timers: LaneTimerTable,
}

impl Pipeline {
    /// Assemble the pipeline from its collaborators.
    pub fn new(
        registry: LaneRegistry,
        sequencer: Sequencer,
        store: Arc<dyn TransactionStore>,
        snapshot: SnapshotWriter,
    ) -> Arc<Self> {
        Arc::new(Self {
            registry,
            sequencer: Mutex::new(sequencer),
            store,
            snapshot: Arc::new(snapshot),
            timers: LaneTimerTable::new(),
        })
    }

    /// The lane registry this pipeline dispatches against.
    #[must_use]
    pub fn registry(&self) -> &LaneRegistry {
        &self.registry
    }

    /// Handle one raw reading line end to end.
    ///
    /// A line that fails parsing is rejected whole: no transaction, no
    /// dispatch, one diagnostic log line. Faults further down the chain
    /// are logged and contained here; this function never fails.
    pub async fn handle_line(&self, raw: &str, peer: Option<SocketAddr>) {
        let reading = match Reading::parse(raw) {
            Ok(reading) => reading,
            Err(error) => {
                debug!(?peer, raw, %error, "rejected datagram");
                return;
            },
        };

        // Record and snapshot under one lock acquisition so a concurrent
        // handler cannot observe the buffer mid-update or mint the same
        // transaction number.
        let (txn, doc) = {
            let mut sequencer = self.sequencer.lock().unwrap_or_else(PoisonError::into_inner);
            let txn = sequencer.record(reading, receipt_timestamp());
            (txn, sequencer.snapshot())
        };

        info!(
            txn = txn.txn_no,
            lane = %txn.lane,
            speed = txn.speed_kmh,
            overspeed = txn.overspeed,
            "transaction recorded"
        );

        self.persist(txn.clone(), doc);
        self.dispatch(&txn).await;
    }

    /// Store append + snapshot overwrite, off the dispatch path.
    fn persist(&self, txn: Transaction, doc: SnapshotDoc) {
        let store = Arc::clone(&self.store);
        let snapshot = Arc::clone(&self.snapshot);
        tokio::spawn(async move {
            if let Err(error) = store.append(&txn).await {
                warn!(txn = txn.txn_no, %error, "store append failed");
            }
            if let Err(error) = snapshot.write(&doc).await {
                warn!(%error, "snapshot write failed");
            }
        });
    }

    /// Send the show command and arm the lane's clear timer.
    async fn dispatch(&self, txn: &Transaction) {
        let Some(endpoint) = self.registry.endpoint(&txn.lane) else {
            debug!(lane = %txn.lane, "no display registered, dispatch skipped");
            return;
        };

        let plan = DispatchPlan::for_transaction(txn);

        if let Err(error) = sender::send_command(endpoint, plan.show.encode()).await {
            warn!(lane = %txn.lane, %endpoint, %error, "show send failed");
        }

        let clear = plan.clear.encode();
        let lane = txn.lane.clone();
        self.timers.arm(&txn.lane, plan.hold, async move {
            match sender::send_command(endpoint, clear).await {
                Ok(()) => debug!(%lane, %endpoint, "display cleared"),
                Err(error) => warn!(%lane, %endpoint, %error, "clear send failed"),
            }
        });
    }
}
