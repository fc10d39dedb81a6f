//! The poll loop.
//!
//! Every interval the loop refreshes the snapshot, asks the consumer for
//! events it has not seen, and logs them. A failed refresh is logged and
//! retried on the next interval; the consumer's cursor is untouched.

use std::time::Duration;

use chrono::SecondsFormat;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use ringview_core::{EventConsumer, SeqCursor, Slot};

use crate::config::PollConfig;
use crate::source::SnapshotSource;

/// Poll loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    /// Time between refreshes.
    pub interval: Duration,
    /// Stop after this many polls. Zero means unbounded.
    pub max_polls: u64,
}

impl From<&PollConfig> for WatchSettings {
    fn from(poll: &PollConfig) -> Self {
        Self {
            interval: Duration::from_millis(poll.interval_ms.max(1)),
            max_polls: poll.max_polls,
        }
    }
}

/// What a finished watch run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOutcome {
    /// Refresh attempts, successful or not.
    pub polls: u64,
    /// Events handed out by the consumer.
    pub events: u64,
    /// Refresh attempts that failed.
    pub failures: u64,
    /// Consumer cursor at exit.
    pub cursor: SeqCursor,
}

/// Run the poll loop until `shutdown` resolves or `max_polls` is reached.
pub async fn run_watch<S, F>(
    source: &S,
    consumer: &mut EventConsumer,
    settings: WatchSettings,
    shutdown: F,
) -> WatchOutcome
where
    S: SnapshotSource,
    F: Future<Output = ()>,
{
    let mut outcome = WatchOutcome {
        polls: 0,
        events: 0,
        failures: 0,
        cursor: consumer.cursor(),
    };

    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            _ = ticker.tick() => {}
        }

        match source.load().await {
            Ok(snapshot) => {
                let fresh = consumer.poll(&snapshot);
                for slot in &fresh {
                    log_event(slot);
                }
                outcome.events = outcome
                    .events
                    .saturating_add(u64::try_from(fresh.len()).unwrap_or(u64::MAX));

                let summary = snapshot.summary();
                debug!(
                    head = snapshot.head(),
                    count = snapshot.count(),
                    seq_num = snapshot.seq_num(),
                    fills = summary.fills,
                    outs = summary.outs,
                    liquidations = summary.liquidations,
                    empty = summary.empty,
                    "live window"
                );
            }
            Err(e) => {
                outcome.failures = outcome.failures.saturating_add(1);
                warn!(error = %e, "snapshot refresh failed, retrying next interval");
            }
        }

        outcome.polls = outcome.polls.saturating_add(1);
        if settings.max_polls > 0 && outcome.polls >= settings.max_polls {
            info!(max_polls = settings.max_polls, "poll limit reached");
            break;
        }
    }

    outcome.cursor = consumer.cursor();
    outcome
}

fn log_event(slot: &Slot) {
    let (Some(kind), Some(record)) = (slot.kind(), slot.record()) else {
        return;
    };
    let time = record
        .datetime()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();
    info!(
        kind = %kind,
        seq_num = record.seq_num,
        timestamp = record.timestamp,
        time = %time,
        payload_fields = record.payload.len(),
        "new event"
    );
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use ringview_core::{EventQueueSnapshot, EventRecord};

    use super::*;
    use crate::source::SourceError;

    /// Replays a fixed list of results, then keeps failing.
    struct ScriptedSource {
        script: Mutex<VecDeque<Option<EventQueueSnapshot>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<EventQueueSnapshot>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    impl SnapshotSource for ScriptedSource {
        async fn load(&self) -> Result<EventQueueSnapshot, SourceError> {
            let next = self.script.lock().unwrap().pop_front().flatten();
            next.ok_or_else(|| SourceError::Io {
                path: PathBuf::from("scripted"),
                source: std::io::Error::other("no snapshot"),
            })
        }
    }

    fn ring(head: usize, count: usize, seqs: &[u64]) -> EventQueueSnapshot {
        let slots = seqs
            .iter()
            .map(|&s| Slot::Fill(EventRecord::new(1_700_000_000 + s, s)))
            .collect();
        let seq_num = seqs.iter().copied().max().unwrap_or(0);
        EventQueueSnapshot::new(head, count, seq_num, slots).unwrap()
    }

    fn settings(max_polls: u64) -> WatchSettings {
        WatchSettings {
            interval: Duration::from_millis(10),
            max_polls,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_max_polls() {
        let source = ScriptedSource::new(vec![
            Some(ring(0, 2, &[1, 2])),
            Some(ring(0, 3, &[1, 2, 3])),
            Some(ring(1, 3, &[1, 2, 3, 4])),
        ]);
        let mut consumer = EventConsumer::new();

        let outcome =
            run_watch(&source, &mut consumer, settings(3), std::future::pending()).await;

        assert_eq!(outcome.polls, 3);
        assert_eq!(outcome.events, 4);
        assert_eq!(outcome.failures, 0);
        assert_eq!(outcome.cursor, SeqCursor::After(4));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_cursor_and_continues() {
        let source = ScriptedSource::new(vec![
            Some(ring(0, 1, &[1])),
            None,
            Some(ring(0, 2, &[1, 2])),
        ]);
        let mut consumer = EventConsumer::new();

        let outcome =
            run_watch(&source, &mut consumer, settings(3), std::future::pending()).await;

        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.events, 2);
        assert_eq!(outcome.cursor, SeqCursor::After(2));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_wins_over_first_tick() {
        let source = ScriptedSource::new(vec![Some(ring(0, 1, &[1]))]);
        let mut consumer = EventConsumer::with_cursor(SeqCursor::After(9));

        let outcome = run_watch(&source, &mut consumer, settings(0), async {}).await;

        assert_eq!(outcome.polls, 0);
        assert_eq!(outcome.cursor, SeqCursor::After(9));
    }

    #[test]
    fn settings_from_poll_config() {
        let poll = PollConfig {
            interval_ms: 0,
            max_polls: 5,
            start_after: None,
        };
        let settings = WatchSettings::from(&poll);
        assert_eq!(settings.interval, Duration::from_millis(1));
        assert_eq!(settings.max_polls, 5);
    }
}
