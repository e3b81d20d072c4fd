//! Per-lane clear timers.
//!
//! Each lane has at most one pending clear at any instant. Arming a lane
//! that already has a pending timer cancels and replaces it in a single
//! step under the table lock, and a superseded timer's action never runs
//! even if it is racing to fire.
//!
//! # State machine (per lane)
//!
//! ```text
//!          arm                    fire / cancel
//! Idle ──────────────> Armed ──────────────────> Idle
//!                       │ ▲
//!                       └─┘ arm (fresh deadline, old action discarded)
//! ```
//!
//! A superseded task is aborted, and the fired path re-checks its
//! generation under the lock before acting, so an abort that loses the
//! race against a task already past its sleep still cannot produce a
//! second clear.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// A pending clear for one lane.
struct Armed {
    generation: u64,
    task: JoinHandle<()>,
}

/// Table state guarded by one lock; the read-cancel-install sequence in
/// [`LaneTimerTable::arm`] and the superseded check in the fire path are
/// both atomic with respect to it.
#[derive(Default)]
struct TableState {
    next_generation: u64,
    pending: HashMap<String, Armed>,
}

/// Concurrency-safe map from lane identifier to its pending clear timer.
///
/// Cloning is cheap and shares the underlying table.
#[derive(Clone, Default)]
pub struct LaneTimerTable {
    state: Arc<Mutex<TableState>>,
}

impl LaneTimerTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the clear timer for a lane.
    ///
    /// After `hold` elapses, `action` runs, unless another `arm` for the
    /// same lane supersedes this one first, in which case the action is
    /// discarded without running.
    pub fn arm<F>(&self, lane: &str, hold: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        state.next_generation += 1;
        let generation = state.next_generation;

        if let Some(old) = state.pending.remove(lane) {
            old.task.abort();
            debug!(lane, superseded = old.generation, "pending clear replaced");
        }

        let task = tokio::spawn(fire_after(
            Arc::clone(&self.state),
            lane.to_string(),
            generation,
            hold,
            action,
        ));
        state.pending.insert(lane.to_string(), Armed { generation, task });
    }

    /// Number of lanes currently in the `Armed` state.
    #[must_use]
    pub fn pending_lanes(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).pending.len()
    }
}

/// Sleep out the hold, then run the action if this timer is still the
/// lane's current one.
async fn fire_after<F>(
    state: Arc<Mutex<TableState>>,
    lane: String,
    generation: u64,
    hold: Duration,
    action: F,
) where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::time::sleep(hold).await;

    // Superseded guard: only the installed generation may fire, and it
    // transitions the lane back to Idle before acting.
    let current = {
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.pending.get(&lane) {
            Some(armed) if armed.generation == generation => {
                state.pending.remove(&lane);
                true
            },
            _ => false,
        }
    };

    if current {
        action.await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time;

    use super::*;

    fn counting(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_after_hold() {
        let table = LaneTimerTable::new();
        let fired = Arc::new(AtomicUsize::new(0));

        table.arm("1", Duration::from_millis(1500), counting(&fired));
        assert_eq!(table.pending_lanes(), 1);

        time::sleep(Duration::from_millis(1499)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(table.pending_lanes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_discards_the_previous_action() {
        let table = LaneTimerTable::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        // A slow reading arms a 4s clear; a fast reading 100ms later
        // re-arms with 1.5s. Only the second clear may ever fire.
        table.arm("1", Duration::from_millis(4000), counting(&first));
        time::sleep(Duration::from_millis(100)).await;
        table.arm("1", Duration::from_millis(1500), counting(&second));
        assert_eq!(table.pending_lanes(), 1);

        time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn lanes_time_out_independently() {
        let table = LaneTimerTable::new();
        let lane1 = Arc::new(AtomicUsize::new(0));
        let lane2 = Arc::new(AtomicUsize::new(0));

        table.arm("1", Duration::from_millis(4000), counting(&lane1));
        table.arm("2", Duration::from_millis(1500), counting(&lane2));
        assert_eq!(table.pending_lanes(), 2);

        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(lane1.load(Ordering::SeqCst), 0);
        assert_eq!(lane2.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_millis(2001)).await;
        assert_eq!(lane1.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn lane_can_be_rearmed_after_firing() {
        let table = LaneTimerTable::new();
        let fired = Arc::new(AtomicUsize::new(0));

        table.arm("1", Duration::from_millis(1500), counting(&fired));
        time::sleep(Duration::from_millis(1501)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        table.arm("1", Duration::from_millis(1500), counting(&fired));
        time::sleep(Duration::from_millis(1501)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_rearms_fire_exactly_once() {
        let table = LaneTimerTable::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..50 {
            table.arm("1", Duration::from_millis(1500), counting(&fired));
        }

        time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(table.pending_lanes(), 0);
    }
}
