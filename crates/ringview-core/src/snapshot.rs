//! The immutable, validated copy of the ledger's event ring.
//!
//! # Validation
//!
//! A snapshot is checked once, on construction:
//!
//! - `head < capacity` whenever the ring has any slots.
//! - `count <= capacity`, which also rejects a zero-capacity ring that
//!   claims live events.
//!
//! Nothing else is validated. Slots inside the live window may still be
//! empty, and sequence numbers are taken as decoded.

use serde::{Deserialize, Serialize};

use ringview_types::{SeqCursor, Slot};

use crate::summary::QueueSummary;
use crate::{QueueError, view};

/// Decoded ring header and slot array, as produced by the decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSnapshot {
    #[serde(deserialize_with = "ringview_types::de_u64")]
    head: u64,
    #[serde(deserialize_with = "ringview_types::de_u64")]
    count: u64,
    #[serde(rename = "seqNum", deserialize_with = "ringview_types::de_u64")]
    seq_num: u64,
    events: Vec<Slot>,
}

/// One point-in-time copy of the ledger's event ring.
///
/// Fields are private; a snapshot cannot change after construction. Refresh
/// by building a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct EventQueueSnapshot {
    /// Index of the oldest live slot.
    head: usize,
    /// Number of live slots.
    count: usize,
    /// Highest sequence number the ledger has assigned.
    seq_num: u64,
    /// The full backing array.
    slots: Vec<Slot>,
}

impl EventQueueSnapshot {
    /// Build a snapshot from decoded parts.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidSnapshot`] if `head` or `count` do not
    /// fit the slot array.
    pub fn new(
        head: usize,
        count: usize,
        seq_num: u64,
        slots: Vec<Slot>,
    ) -> Result<Self, QueueError> {
        let capacity = slots.len();

        if count > capacity {
            return Err(QueueError::InvalidSnapshot {
                reason: format!("count {count} exceeds capacity {capacity}"),
            });
        }
        if capacity > 0 && head >= capacity {
            return Err(QueueError::InvalidSnapshot {
                reason: format!("head {head} out of range for capacity {capacity}"),
            });
        }

        Ok(Self {
            head,
            count,
            seq_num,
            slots,
        })
    }

    /// Index of the oldest live slot.
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Number of live slots.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Highest sequence number the ledger has assigned.
    pub const fn seq_num(&self) -> u64 {
        self.seq_num
    }

    /// Ring capacity (length of the backing array).
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The full backing array in storage order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Live slots in logical order. See [`view::live_events`].
    pub fn live_events(&self) -> Vec<&Slot> {
        view::live_events(self)
    }

    /// Populated slots newer than `cursor`, in storage order. See
    /// [`view::events_since`].
    pub fn events_since(&self, cursor: SeqCursor) -> Vec<&Slot> {
        view::events_since(self, cursor)
    }

    /// Populated slots newer than `cursor`, walked back from the end of the
    /// live window. See [`view::events_since_circular`].
    pub fn events_since_circular(&self, cursor: SeqCursor) -> Vec<&Slot> {
        view::events_since_circular(self, cursor)
    }

    /// Populated slots newer than `cursor`, sorted by sequence number. See
    /// [`view::events_since_ordered`].
    pub fn events_since_ordered(&self, cursor: SeqCursor) -> Vec<&Slot> {
        view::events_since_ordered(self, cursor)
    }

    /// Aggregate counts over the live window.
    pub fn summary(&self) -> QueueSummary {
        QueueSummary::from_snapshot(self)
    }
}

impl TryFrom<RawSnapshot> for EventQueueSnapshot {
    type Error = QueueError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let head = usize::try_from(raw.head).map_err(|err| QueueError::InvalidSnapshot {
            reason: format!("head {}: {err}", raw.head),
        })?;
        let count = usize::try_from(raw.count).map_err(|err| QueueError::InvalidSnapshot {
            reason: format!("count {}: {err}", raw.count),
        })?;
        Self::new(head, count, raw.seq_num, raw.events)
    }
}

impl From<EventQueueSnapshot> for RawSnapshot {
    fn from(snapshot: EventQueueSnapshot) -> Self {
        Self {
            head: u64::try_from(snapshot.head).unwrap_or(u64::MAX),
            count: u64::try_from(snapshot.count).unwrap_or(u64::MAX),
            seq_num: snapshot.seq_num,
            events: snapshot.slots,
        }
    }
}
