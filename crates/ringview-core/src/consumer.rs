//! Polling consumer that carries its cursor from one snapshot to the next.
//!
//! A poller refreshes its snapshot on some interval and wants exactly the
//! events it has not handled yet. [`EventConsumer`] keeps the highest
//! sequence number it has returned and feeds it back into
//! [`events_since`](crate::view::events_since) on the next poll.

use tracing::debug;

use ringview_types::{SeqCursor, Slot};

use crate::snapshot::EventQueueSnapshot;
use crate::view;

/// Stateful reader over a series of snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventConsumer {
    /// Position of the last event handed out.
    cursor: SeqCursor,
    /// Number of polls served.
    polls: u64,
}

impl EventConsumer {
    /// Create a consumer that has seen nothing yet.
    pub const fn new() -> Self {
        Self {
            cursor: SeqCursor::Start,
            polls: 0,
        }
    }

    /// Create a consumer resuming from a saved cursor.
    pub const fn with_cursor(cursor: SeqCursor) -> Self {
        Self { cursor, polls: 0 }
    }

    /// Current cursor.
    pub const fn cursor(&self) -> SeqCursor {
        self.cursor
    }

    /// Number of polls served so far.
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    /// Forget everything seen and start over from bootstrap.
    pub const fn reset(&mut self) {
        self.cursor = SeqCursor::Start;
    }

    /// Return the events in `snapshot` that are new to this consumer and
    /// advance the cursor past them.
    ///
    /// The cursor moves to the highest sequence number returned. If nothing
    /// is returned the cursor stays where it was.
    pub fn poll<'s>(&mut self, snapshot: &'s EventQueueSnapshot) -> Vec<&'s Slot> {
        self.polls = self.polls.saturating_add(1);

        let fresh = view::events_since(snapshot, self.cursor);
        if let Some(newest) = fresh.iter().filter_map(|slot| slot.seq_num()).max() {
            self.cursor = self.cursor.advance_to(newest);
            debug!(
                new_events = fresh.len(),
                cursor = newest,
                snapshot_seq_num = snapshot.seq_num(),
                "consumer advanced"
            );
        }

        fresh
    }
}
