//! Dispatch planning for accepted transactions.
//!
//! Maps a transaction to the wire commands and the display-hold duration.
//! This is the declarative half of the dispatcher: the server executes
//! the plan (send show, arm the clear timer) while everything decided
//! here stays pure.

use std::time::Duration;

use vasd_proto::DisplayCommand;

use crate::sequencer::Transaction;

/// Inclusive speed ceilings for the display-hold buckets, in km/h.
///
/// The ceilings and holds come from the deployed installation and are
/// kept as-is rather than re-derived.
const HOLD_BUCKETS: [(u32, Duration); 3] = [
    (50, Duration::from_millis(4000)),
    (60, Duration::from_millis(3000)),
    (80, Duration::from_millis(2000)),
];

/// Hold applied above the highest bucket ceiling.
const HOLD_FAST: Duration = Duration::from_millis(1500);

/// How long the display keeps showing a speed before it is cleared.
#[must_use]
pub fn hold_duration(speed_kmh: u32) -> Duration {
    HOLD_BUCKETS
        .iter()
        .find(|(ceiling, _)| speed_kmh <= *ceiling)
        .map_or(HOLD_FAST, |(_, hold)| *hold)
}

/// Everything the server needs to drive one lane display for one
/// transaction: the show command, the matching clear command, and how
/// long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Command that renders the speed on the panel.
    pub show: DisplayCommand,
    /// Command that blanks the panel after the hold elapses.
    pub clear: DisplayCommand,
    /// Time the panel keeps showing the speed.
    pub hold: Duration,
}

impl DispatchPlan {
    /// Build the plan for a recorded transaction.
    #[must_use]
    pub fn for_transaction(txn: &Transaction) -> Self {
        Self {
            show: DisplayCommand::Show { speed_kmh: txn.speed_kmh, overspeed: txn.overspeed },
            clear: DisplayCommand::Clear,
            hold: hold_duration(txn.speed_kmh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_buckets_match_at_boundaries() {
        let cases = [
            (0, 4000),
            (50, 4000),
            (51, 3000),
            (60, 3000),
            (61, 2000),
            (80, 2000),
            (81, 1500),
            (200, 1500),
        ];
        for (speed, millis) in cases {
            assert_eq!(hold_duration(speed), Duration::from_millis(millis), "speed {speed}");
        }
    }

    #[test]
    fn plan_uses_overspeed_show_variant() {
        let txn = Transaction {
            txn_no: 1,
            lane: "2".into(),
            speed_kmh: 95,
            observed_at: "2024-01-01 10:00:00".into(),
            overspeed: true,
        };

        let plan = DispatchPlan::for_transaction(&txn);
        assert_eq!(plan.show, DisplayCommand::Show { speed_kmh: 95, overspeed: true });
        assert_eq!(plan.clear, DisplayCommand::Clear);
        assert_eq!(plan.hold, Duration::from_millis(1500));
    }
}
