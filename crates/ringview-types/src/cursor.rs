//! Sequence-number cursor for incremental consumption.

use crate::event::EventRecord;

/// How far a consumer has read into the ledger's event stream.
///
/// `Start` is the bootstrap state of a consumer that has never processed an
/// event. `After(n)` means every event with sequence number `<= n` has
/// already been handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SeqCursor {
    /// Nothing seen yet.
    #[default]
    Start,
    /// The highest sequence number already processed.
    After(u64),
}

impl SeqCursor {
    /// Return whether `record` is new relative to this cursor.
    ///
    /// At `Start` any record the ledger has ever written qualifies
    /// (non-zero timestamp). Otherwise the sequence number must be strictly
    /// greater than the cursor.
    pub const fn admits(self, record: &EventRecord) -> bool {
        match self {
            Self::Start => record.has_timestamp(),
            Self::After(last) => record.seq_num > last,
        }
    }

    /// Return the cursor after processing an event with `seq_num`.
    ///
    /// Never moves backwards.
    #[must_use]
    pub const fn advance_to(self, seq_num: u64) -> Self {
        match self {
            Self::After(last) if last >= seq_num => self,
            Self::Start | Self::After(_) => Self::After(seq_num),
        }
    }

    /// The last processed sequence number, if any.
    pub const fn last_seq_num(self) -> Option<u64> {
        match self {
            Self::Start => None,
            Self::After(last) => Some(last),
        }
    }
}

impl From<Option<u64>> for SeqCursor {
    fn from(last: Option<u64>) -> Self {
        last.map_or(Self::Start, Self::After)
    }
}
