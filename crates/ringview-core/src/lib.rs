//! Read-only view over a decoded ledger event ring.
//!
//! The ledger program appends perp events into a fixed-capacity ring and
//! tracks the live window with a `head` index and a `count`. A local mirror
//! of that account is decoded elsewhere into an [`EventQueueSnapshot`]; this
//! crate answers two questions about it:
//!
//! - **What is live now?** [`live_events`] walks the `count` slots starting
//!   at `head`, wrapping around the end of the array.
//! - **What is new since I last looked?** [`events_since`] scans the whole
//!   backing array in storage order and keeps every populated slot newer
//!   than the caller's [`SeqCursor`].
//!
//! # Architecture
//!
//! - [`snapshot`] -- The validated, immutable [`EventQueueSnapshot`].
//! - [`view`] -- Pure read operations over a snapshot.
//! - [`summary`] -- [`QueueSummary`] aggregation over the live window.
//! - [`consumer`] -- [`EventConsumer`], a polling reader that carries its
//!   cursor across snapshots.
//!
//! # Ordering
//!
//! [`live_events`] is head-relative. [`events_since`] is storage-relative
//! and only matches sequence order while the ring has not wrapped since the
//! consumer's last read. [`events_since_circular`] and
//! [`events_since_ordered`] are offered for callers that need sequence
//! order after a wrap.
//!
//! # Usage
//!
//! ```
//! use ringview_core::{EventConsumer, EventQueueSnapshot};
//! use ringview_types::{EventRecord, SeqCursor, Slot};
//!
//! let slots = vec![
//!     Slot::Fill(EventRecord::new(100, 5)),
//!     Slot::Empty,
//!     Slot::Out(EventRecord::new(101, 6)),
//!     Slot::Empty,
//! ];
//! let snapshot = EventQueueSnapshot::new(0, 3, 6, slots).ok();
//! let Some(snapshot) = snapshot else { return };
//!
//! assert_eq!(snapshot.live_events().len(), 3);
//! assert_eq!(snapshot.events_since(SeqCursor::After(5)).len(), 1);
//!
//! let mut consumer = EventConsumer::new();
//! assert_eq!(consumer.poll(&snapshot).len(), 2);
//! assert_eq!(consumer.cursor(), SeqCursor::After(6));
//! ```

pub mod consumer;
pub mod snapshot;
pub mod summary;
pub mod view;

// Re-export primary types at crate root.
pub use consumer::EventConsumer;
pub use ringview_types::{EventKind, EventRecord, SeqCursor, Slot};
pub use snapshot::EventQueueSnapshot;
pub use summary::QueueSummary;
pub use view::{events_since, events_since_circular, events_since_ordered, live_events};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while constructing a snapshot.
///
/// A malformed snapshot means the upstream decoder is broken. The read
/// operations themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The decoded header is inconsistent with the slot array.
    #[error("invalid snapshot: {reason}")]
    InvalidSnapshot {
        /// What is wrong with the snapshot.
        reason: String,
    },
}
