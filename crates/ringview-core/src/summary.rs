//! Aggregate view of the live window for display layers.

use ringview_types::{EventKind, Slot};

use crate::snapshot::EventQueueSnapshot;
use crate::view;

/// Counts of each event kind inside the live window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSummary {
    /// Live fill events.
    pub fills: usize,
    /// Live out events.
    pub outs: usize,
    /// Live liquidation events.
    pub liquidations: usize,
    /// Live positions that hold no event.
    pub empty: usize,
    /// Sequence number of the first populated live event.
    pub oldest_seq_num: Option<u64>,
    /// Sequence number of the last populated live event.
    pub newest_seq_num: Option<u64>,
}

impl QueueSummary {
    /// Summarize the live window of `snapshot`.
    pub fn from_snapshot(snapshot: &EventQueueSnapshot) -> Self {
        Self::from_slots(view::live_events(snapshot))
    }

    /// Summarize a sequence of slots given oldest first.
    ///
    /// The oldest and newest sequence numbers follow iteration order, not
    /// numeric order, so they stay correct across a `u64` wrap.
    pub fn from_slots<'a, I>(slots: I) -> Self
    where
        I: IntoIterator<Item = &'a Slot>,
    {
        let mut summary = Self::default();

        for slot in slots {
            match slot.kind() {
                Some(EventKind::Fill) => summary.fills = summary.fills.saturating_add(1),
                Some(EventKind::Out) => summary.outs = summary.outs.saturating_add(1),
                Some(EventKind::Liquidate) => {
                    summary.liquidations = summary.liquidations.saturating_add(1);
                }
                None => summary.empty = summary.empty.saturating_add(1),
            }

            if let Some(seq) = slot.seq_num() {
                summary.oldest_seq_num.get_or_insert(seq);
                summary.newest_seq_num = Some(seq);
            }
        }

        summary
    }

    /// Number of populated live events.
    pub const fn populated(&self) -> usize {
        self.fills
            .saturating_add(self.outs)
            .saturating_add(self.liquidations)
    }
}
