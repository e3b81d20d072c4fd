//! Transaction numbering and recent history.
//!
//! The sequencer owns the single authoritative transaction counter and
//! the bounded newest-first buffer of recent transactions. It is
//! deliberately single-threaded: the server wraps it in a mutex so that
//! concurrent handler tasks serialize `record` and `snapshot` as one
//! unit, which rules out duplicate transaction numbers and snapshots
//! that interleave with a half-applied record.
//!
//! The persisted store is authoritative across restarts; the counter is
//! seeded from it once at startup and incremented in memory thereafter.
//! Numbering tolerates gaps on store failure, never duplicates.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use vasd_proto::Reading;

/// Speed threshold in km/h above which a reading counts as overspeed.
pub const OVERSPEED_KMH: u32 = 80;

/// Capacity of the recent-history buffer.
pub const RECENT_CAPACITY: usize = 10;

/// A numbered, immutable record of one accepted reading.
///
/// Serialized field names use the external spellings (`txn`, `speed`,
/// `timestamp`) that the snapshot consumers and the persisted store
/// already expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Strictly increasing transaction number, unique for the lifetime
    /// of the persisted store.
    #[serde(rename = "txn")]
    pub txn_no: u64,
    /// Lane the reading was taken on.
    pub lane: String,
    /// Measured speed in km/h.
    #[serde(rename = "speed")]
    pub speed_kmh: u32,
    /// Observation timestamp: radar-supplied when present, receipt time
    /// otherwise.
    #[serde(rename = "timestamp")]
    pub observed_at: String,
    /// Whether the speed exceeds [`OVERSPEED_KMH`].
    pub overspeed: bool,
}

/// Document handed to the external presentation collaborator on every
/// recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDoc {
    /// The most recently recorded transaction, if any.
    pub latest: Option<Transaction>,
    /// The recent-history buffer, newest first.
    pub recent: Vec<Transaction>,
}

/// Assigns transaction numbers and maintains the recent history.
#[derive(Debug)]
pub struct Sequencer {
    last_txn_no: u64,
    recent: VecDeque<Transaction>,
}

impl Sequencer {
    /// Create a sequencer seeded with the greatest transaction number
    /// already persisted (0 for an empty store).
    #[must_use]
    pub fn new(last_txn_no: u64) -> Self {
        Self { last_txn_no, recent: VecDeque::with_capacity(RECENT_CAPACITY) }
    }

    /// Record an accepted reading as the next transaction.
    ///
    /// Increments the counter by exactly one, derives the overspeed
    /// flag, resolves the observation timestamp (radar value when
    /// present, `fallback_observed_at` otherwise) and pushes the new
    /// transaction to the front of the recent buffer, evicting the
    /// oldest entry when full.
    pub fn record(&mut self, reading: Reading, fallback_observed_at: String) -> Transaction {
        self.last_txn_no += 1;

        let txn = Transaction {
            txn_no: self.last_txn_no,
            overspeed: reading.speed_kmh > OVERSPEED_KMH,
            speed_kmh: reading.speed_kmh,
            lane: reading.lane,
            observed_at: reading.observed_at.unwrap_or(fallback_observed_at),
        };

        self.recent.push_front(txn.clone());
        self.recent.truncate(RECENT_CAPACITY);
        txn
    }

    /// The most recently assigned transaction number.
    #[must_use]
    pub fn last_txn_no(&self) -> u64 {
        self.last_txn_no
    }

    /// Build the snapshot document for external consumption.
    #[must_use]
    pub fn snapshot(&self) -> SnapshotDoc {
        SnapshotDoc {
            latest: self.recent.front().cloned(),
            recent: self.recent.iter().cloned().collect(),
        }
    }
}
