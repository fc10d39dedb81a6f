//! Shared type definitions for the ringview event queue reader.
//!
//! The ledger program keeps its perp events in a fixed-capacity ring of
//! slots. Every slot holds one of three event variants or nothing at all.
//! This crate defines those slot and event types, plus the sequence-number
//! cursor a consumer uses to remember how far it has read.
//!
//! # Modules
//!
//! - [`event`] -- Event variants, the shared event record, and ring slots
//! - [`cursor`] -- The [`SeqCursor`] a polling consumer carries between reads

pub mod cursor;
pub mod event;

// Re-export all public types at crate root for convenience.
pub use cursor::SeqCursor;
pub use event::{EventKind, EventRecord, Slot, de_u64};
