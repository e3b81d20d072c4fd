//! Core pipeline logic for VASD.
//!
//! Pure domain logic, completely decoupled from I/O. Sockets, clocks,
//! files and the database all live in the server crate; this crate only
//! decides *what* should happen to an accepted reading.
//!
//! State transitions produce plain data the runtime executes: the
//! [`Sequencer`] turns a reading into a numbered [`Transaction`] plus a
//! refreshed [`SnapshotDoc`], and [`DispatchPlan`] describes the wire
//! commands and the display-hold duration for that transaction. Keeping
//! this layer free of effects makes every rule here testable without a
//! runtime.
//!
//! # Components
//!
//! - [`sequencer`]: transaction numbering and the bounded recent history
//! - [`dispatch`]: display-hold buckets and the dispatch action object
//! - [`store`]: the persistence boundary ([`TransactionStore`])

pub mod dispatch;
pub mod sequencer;
pub mod store;

pub use dispatch::{DispatchPlan, hold_duration};
pub use sequencer::{OVERSPEED_KMH, RECENT_CAPACITY, Sequencer, SnapshotDoc, Transaction};
pub use store::{MemoryStore, StoreError, TransactionStore};
