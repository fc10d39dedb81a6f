//! Pure read operations over an [`EventQueueSnapshot`].
//!
//! Every function here is a stateless function of `(snapshot, cursor)`:
//! calling it twice on the same snapshot yields the same slots in the same
//! order. None of them allocate beyond the returned vector, and none of
//! them can fail or panic. A zero-capacity ring always yields nothing.
//!
//! # Storage order vs. logical order
//!
//! ```text
//!  storage index:   0     1     2     3
//!  slots:         [ F5 | O6  | L7  | -- ]     head = 2, count = 3
//!  logical order:   L7, --, F5                (2, 3, 0)
//! ```
//!
//! [`live_events`] returns logical order. [`events_since`] returns storage
//! order, which matches sequence order only until the ledger wraps past the
//! end of the array.

use ringview_types::{SeqCursor, Slot};

use crate::snapshot::EventQueueSnapshot;

/// Return the live window in logical order, oldest first.
///
/// Walks `count` positions starting at `head`, wrapping at the end of the
/// array. Element `i` is `slots[(head + i) % capacity]`. The window may
/// contain [`Slot::Empty`] if the decoded data is inconsistent.
pub fn live_events(snapshot: &EventQueueSnapshot) -> Vec<&Slot> {
    // `cycle` over an empty slice yields nothing, so capacity 0 is safe.
    snapshot
        .slots()
        .iter()
        .cycle()
        .skip(snapshot.head())
        .take(snapshot.count())
        .collect()
}

/// Return every populated slot newer than `cursor`, in storage order.
///
/// The whole backing array is scanned, not just the live window:
///
/// - At [`SeqCursor::Start`] a slot qualifies if the ledger ever wrote it
///   (`timestamp > 0`).
/// - At [`SeqCursor::After`] a slot qualifies if its `seq_num` is greater.
///
/// Empty slots never qualify. The result is not sorted.
pub fn events_since(snapshot: &EventQueueSnapshot, cursor: SeqCursor) -> Vec<&Slot> {
    snapshot
        .slots()
        .iter()
        .filter(|slot| slot.record().is_some_and(|r| cursor.admits(r)))
        .collect()
}

/// Like [`events_since`], but stably sorted by sequence number.
pub fn events_since_ordered(snapshot: &EventQueueSnapshot, cursor: SeqCursor) -> Vec<&Slot> {
    let mut fresh = events_since(snapshot, cursor);
    fresh.sort_by_key(|slot| slot.seq_num());
    fresh
}

/// Return populated slots in the window that ends at the live tail and
/// reaches back by the number of events the cursor has missed.
///
/// The number of missed events is `snapshot.seq_num - last` in wrapping
/// 64-bit arithmetic, capped at `capacity - 1`. [`SeqCursor::Start`] uses
/// the cap directly. The window ends (exclusive) at `(head + count) %
/// capacity` and is walked forward in logical order.
///
/// Unlike [`events_since`], slots are not filtered by sequence number;
/// the window bounds do that work.
pub fn events_since_circular(snapshot: &EventQueueSnapshot, cursor: SeqCursor) -> Vec<&Slot> {
    let capacity = snapshot.capacity();
    let Some(max_lookback) = capacity.checked_sub(1) else {
        return Vec::new();
    };

    let missed = match cursor {
        SeqCursor::Start => max_lookback,
        SeqCursor::After(last) => {
            let behind = snapshot.seq_num().wrapping_sub(last);
            usize::try_from(behind).map_or(max_lookback, |m| m.min(max_lookback))
        }
    };

    let Some(start) = window_start(snapshot.head(), snapshot.count(), missed, capacity) else {
        return Vec::new();
    };

    snapshot
        .slots()
        .iter()
        .cycle()
        .skip(start)
        .take(missed)
        .filter(|slot| slot.is_populated())
        .collect()
}

/// `(head + count + capacity - missed) % capacity`, without overflow.
///
/// Requires `head < capacity`, `count <= capacity`, `missed < capacity`.
fn window_start(head: usize, count: usize, missed: usize, capacity: usize) -> Option<usize> {
    let end = head.checked_add(count)?.checked_rem(capacity)?;
    end.checked_add(capacity)?
        .checked_sub(missed)?
        .checked_rem(capacity)
}

#[cfg(test)]
mod tests {
    use ringview_types::EventRecord;

    use super::*;

    fn fill(seq: u64, ts: u64) -> Slot {
        Slot::Fill(EventRecord::new(ts, seq))
    }

    fn out(seq: u64, ts: u64) -> Slot {
        Slot::Out(EventRecord::new(ts, seq))
    }

    fn liquidate(seq: u64, ts: u64) -> Slot {
        Slot::Liquidate(EventRecord::new(ts, seq))
    }

    fn snapshot(head: usize, count: usize, seq_num: u64, slots: Vec<Slot>) -> EventQueueSnapshot {
        EventQueueSnapshot::new(head, count, seq_num, slots).unwrap()
    }

    fn seqs(slots: &[&Slot]) -> Vec<Option<u64>> {
        slots.iter().map(|s| s.seq_num()).collect()
    }

    // --- live_events ---

    #[test]
    fn live_events_wraps_around_the_end() {
        let snap = snapshot(
            2,
            3,
            7,
            vec![fill(5, 100), out(6, 101), liquidate(7, 102), Slot::Empty],
        );
        let live = live_events(&snap);

        assert_eq!(live.len(), 3);
        assert_eq!(live[0], &liquidate(7, 102));
        assert_eq!(live[1], &Slot::Empty);
        assert_eq!(live[2], &fill(5, 100));
    }

    #[test]
    fn live_events_matches_modular_index_for_every_header() {
        let slots: Vec<Slot> = (0..5).map(|i| out(i, 10 + i)).collect();
        let n = slots.len();
        for head in 0..n {
            for count in 0..=n {
                let snap = snapshot(head, count, 4, slots.clone());
                let live = live_events(&snap);
                assert_eq!(live.len(), count);
                for (i, slot) in live.iter().enumerate() {
                    assert_eq!(*slot, &slots[(head + i) % n], "head={head} count={count} i={i}");
                }
            }
        }
    }

    #[test]
    fn live_events_empty_when_count_zero() {
        for head in 0..3 {
            let snap = snapshot(head, 0, 3, vec![fill(1, 1), fill(2, 2), fill(3, 3)]);
            assert!(live_events(&snap).is_empty());
        }
    }

    #[test]
    fn live_events_empty_for_zero_capacity() {
        let snap = snapshot(0, 0, 0, Vec::new());
        assert!(live_events(&snap).is_empty());
    }

    // --- events_since ---

    #[test]
    fn events_since_after_cursor() {
        let snap = snapshot(
            0,
            2,
            6,
            vec![fill(5, 100), Slot::Empty, out(6, 101), Slot::Empty],
        );
        let fresh = events_since(&snap, SeqCursor::After(5));
        assert_eq!(fresh, vec![&out(6, 101)]);
    }

    #[test]
    fn events_since_bootstrap_uses_timestamp() {
        let snap = snapshot(
            0,
            3,
            3,
            vec![fill(1, 0), out(2, 50), Slot::Empty, liquidate(3, 60)],
        );
        let fresh = events_since(&snap, SeqCursor::Start);
        assert_eq!(seqs(&fresh), vec![Some(2), Some(3)]);
    }

    #[test]
    fn events_since_bootstrap_with_no_timestamps_is_empty() {
        let snap = snapshot(0, 3, 3, vec![fill(1, 0), out(2, 0), liquidate(3, 0)]);
        assert!(events_since(&snap, SeqCursor::Start).is_empty());
    }

    #[test]
    fn events_since_scans_outside_live_window() {
        // Only slot 0 is live, but slot 2 holds a newer, stale event.
        let snap = snapshot(0, 1, 9, vec![fill(8, 10), Slot::Empty, out(9, 11)]);
        let fresh = events_since(&snap, SeqCursor::After(7));
        assert_eq!(seqs(&fresh), vec![Some(8), Some(9)]);
    }

    #[test]
    fn events_since_keeps_storage_order_after_wrap() {
        // Ledger wrapped: slot 0 holds seq 4, slot 1..2 hold seq 2..3.
        let snap = snapshot(1, 3, 4, vec![fill(4, 40), out(2, 20), out(3, 30)]);
        let fresh = events_since(&snap, SeqCursor::After(1));
        assert_eq!(seqs(&fresh), vec![Some(4), Some(2), Some(3)]);
    }

    #[test]
    fn events_since_past_every_seq_is_empty() {
        let snap = snapshot(0, 2, 6, vec![fill(5, 100), out(6, 101)]);
        assert!(events_since(&snap, SeqCursor::After(6)).is_empty());
        assert!(events_since(&snap, SeqCursor::After(u64::MAX)).is_empty());
    }

    #[test]
    fn events_since_never_returns_empty_slots() {
        let snap = snapshot(0, 0, 0, vec![Slot::Empty; 4]);
        assert!(events_since(&snap, SeqCursor::Start).is_empty());
        assert!(events_since(&snap, SeqCursor::After(0)).is_empty());
    }

    #[test]
    fn reads_are_idempotent() {
        let snap = snapshot(1, 2, 3, vec![fill(3, 3), out(1, 1), liquidate(2, 2)]);
        assert_eq!(live_events(&snap), live_events(&snap));
        assert_eq!(
            events_since(&snap, SeqCursor::After(1)),
            events_since(&snap, SeqCursor::After(1))
        );
    }

    // --- events_since_ordered ---

    #[test]
    fn ordered_sorts_by_sequence_number() {
        let snap = snapshot(1, 3, 4, vec![fill(4, 40), out(2, 20), out(3, 30)]);
        let fresh = events_since_ordered(&snap, SeqCursor::After(1));
        assert_eq!(seqs(&fresh), vec![Some(2), Some(3), Some(4)]);
    }

    // --- events_since_circular ---

    #[test]
    fn circular_returns_missed_tail_of_window() {
        // head 1, count 3 -> live positions 1, 2, 3; end = 0.
        let snap = snapshot(
            1,
            3,
            7,
            vec![fill(4, 40), out(5, 50), out(6, 60), liquidate(7, 70)],
        );
        let fresh = events_since_circular(&snap, SeqCursor::After(5));
        assert_eq!(seqs(&fresh), vec![Some(6), Some(7)]);
    }

    #[test]
    fn circular_follows_logical_order_across_wrap() {
        // head 2, count 3 -> positions 2, 3, 0; end = 1.
        let snap = snapshot(
            2,
            3,
            9,
            vec![fill(9, 90), Slot::Empty, out(7, 70), out(8, 80)],
        );
        let fresh = events_since_circular(&snap, SeqCursor::After(6));
        assert_eq!(seqs(&fresh), vec![Some(7), Some(8), Some(9)]);
    }

    #[test]
    fn circular_caps_lookback_below_capacity() {
        let snap = snapshot(0, 3, 3, vec![fill(1, 1), fill(2, 2), fill(3, 3)]);
        // 3 missed events, but at most capacity - 1 are reachable.
        let fresh = events_since_circular(&snap, SeqCursor::After(0));
        assert_eq!(seqs(&fresh), vec![Some(2), Some(3)]);

        let boot = events_since_circular(&snap, SeqCursor::Start);
        assert_eq!(seqs(&boot), vec![Some(2), Some(3)]);
    }

    #[test]
    fn circular_up_to_date_cursor_is_empty() {
        let snap = snapshot(0, 2, 2, vec![fill(1, 1), fill(2, 2), Slot::Empty]);
        assert!(events_since_circular(&snap, SeqCursor::After(2)).is_empty());
    }

    #[test]
    fn circular_handles_sequence_wraparound() {
        // The ledger counter wrapped from u64::MAX to 0.
        let snap = snapshot(
            0,
            2,
            0,
            vec![fill(u64::MAX, 10), out(0, 11), Slot::Empty, Slot::Empty],
        );
        let fresh = events_since_circular(&snap, SeqCursor::After(u64::MAX - 1));
        assert_eq!(seqs(&fresh), vec![Some(u64::MAX), Some(0)]);
    }

    #[test]
    fn circular_skips_empty_slots() {
        let snap = snapshot(0, 3, 3, vec![fill(1, 1), Slot::Empty, fill(3, 3), Slot::Empty]);
        let fresh = events_since_circular(&snap, SeqCursor::After(0));
        assert_eq!(seqs(&fresh), vec![Some(1), Some(3)]);
    }

    #[test]
    fn circular_zero_capacity_is_empty() {
        let snap = snapshot(0, 0, 5, Vec::new());
        assert!(events_since_circular(&snap, SeqCursor::After(1)).is_empty());
        assert!(events_since_circular(&snap, SeqCursor::Start).is_empty());
    }

    #[test]
    fn window_start_wraps() {
        assert_eq!(window_start(2, 3, 3, 4), Some(2));
        assert_eq!(window_start(0, 0, 0, 4), Some(0));
        assert_eq!(window_start(3, 4, 1, 4), Some(2));
        assert_eq!(window_start(0, 0, 0, 0), None);
    }
}
