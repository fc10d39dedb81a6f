//! Event variants and ring slots.
//!
//! A decoded ring slot looks like one of:
//!
//! ```text
//! {"fill": {"timestamp": 100, "seqNum": 5, ...}}
//! {"out": {"timestamp": 101, "seqNum": 6, ...}}
//! {"liquidate": {"timestamp": 102, "seqNum": 7, ...}}
//! "empty" | null | {}
//! ```
//!
//! Only `timestamp` and `seqNum` are interpreted. Every other key of an
//! event object is kept verbatim in [`EventRecord::payload`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Event kind
// ---------------------------------------------------------------------------

/// The three event variants the ledger writes into its ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A maker order was (partially) filled by a taker.
    Fill,
    /// An order left the book (cancelled or fully consumed).
    Out,
    /// A position was liquidated.
    Liquidate,
}

impl EventKind {
    /// Return the lowercase wire name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Out => "out",
            Self::Liquidate => "liquidate",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event record
// ---------------------------------------------------------------------------

/// The fields every event variant shares, plus its opaque payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Ledger clock value when the event was written. Zero means the slot
    /// has never been populated.
    #[serde(deserialize_with = "de_u64")]
    pub timestamp: u64,

    /// Position of this event in the ledger's global write order.
    #[serde(rename = "seqNum", deserialize_with = "de_u64")]
    pub seq_num: u64,

    /// Variant-specific fields, untouched.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl EventRecord {
    /// Create a record with an empty payload.
    pub fn new(timestamp: u64, seq_num: u64) -> Self {
        Self {
            timestamp,
            seq_num,
            payload: Map::new(),
        }
    }

    /// Attach a payload, replacing any existing one.
    #[must_use]
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// Return whether the ledger has ever written this record.
    pub const fn has_timestamp(&self) -> bool {
        self.timestamp > 0
    }

    /// Interpret the timestamp as Unix seconds.
    ///
    /// Returns `None` for a zero timestamp or one outside chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        if !self.has_timestamp() {
            return None;
        }
        let secs = i64::try_from(self.timestamp).ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Accept a `u64` as either a JSON number or a decimal string.
///
/// Big-number decoders commonly stringify 64-bit values. Use with
/// `#[serde(deserialize_with = "ringview_types::de_u64")]`.
///
/// # Errors
///
/// Fails on anything other than a non-negative integer or a string that
/// parses as one.
pub fn de_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// One fixed position in the ring's backing array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "SlotRepr")]
pub enum Slot {
    /// No variant is populated.
    #[default]
    Empty,
    /// A fill event.
    Fill(EventRecord),
    /// An out event.
    Out(EventRecord),
    /// A liquidation event.
    Liquidate(EventRecord),
}

impl Slot {
    /// Build a slot holding `record` as the given kind.
    pub fn from_kind(kind: EventKind, record: EventRecord) -> Self {
        match kind {
            EventKind::Fill => Self::Fill(record),
            EventKind::Out => Self::Out(record),
            EventKind::Liquidate => Self::Liquidate(record),
        }
    }

    /// Return the variant kind, or `None` for an empty slot.
    pub const fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Empty => None,
            Self::Fill(_) => Some(EventKind::Fill),
            Self::Out(_) => Some(EventKind::Out),
            Self::Liquidate(_) => Some(EventKind::Liquidate),
        }
    }

    /// Return the shared event record, or `None` for an empty slot.
    pub const fn record(&self) -> Option<&EventRecord> {
        match self {
            Self::Empty => None,
            Self::Fill(r) | Self::Out(r) | Self::Liquidate(r) => Some(r),
        }
    }

    /// Return whether any variant is populated.
    pub const fn is_populated(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    /// Timestamp of the populated variant.
    pub fn timestamp(&self) -> Option<u64> {
        self.record().map(|r| r.timestamp)
    }

    /// Sequence number of the populated variant.
    pub fn seq_num(&self) -> Option<u64> {
        self.record().map(|r| r.seq_num)
    }
}

/// Accepted decoded shapes for a slot.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlotRepr {
    Tagged(TaggedSlot),
    Null(()),
    Blank(BlankSlot),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum TaggedSlot {
    Empty,
    Fill(EventRecord),
    Out(EventRecord),
    Liquidate(EventRecord),
}

/// `{}` with no keys at all.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BlankSlot {}

impl From<SlotRepr> for Slot {
    fn from(repr: SlotRepr) -> Self {
        match repr {
            SlotRepr::Tagged(TaggedSlot::Fill(r)) => Self::Fill(r),
            SlotRepr::Tagged(TaggedSlot::Out(r)) => Self::Out(r),
            SlotRepr::Tagged(TaggedSlot::Liquidate(r)) => Self::Liquidate(r),
            SlotRepr::Tagged(TaggedSlot::Empty) | SlotRepr::Null(()) | SlotRepr::Blank(_) => {
                Self::Empty
            }
        }
    }
}
