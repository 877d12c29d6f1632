//! Periodic tick sources.
//!
//! A session arms a source when it becomes Active and drops the returned
//! guard on every exit from Active. Dropping the guard disarms the source.
//! Every tick carries the [`TimerId`] of the guard that produced it, so
//! ticks already in flight when a guard is dropped can be told apart from
//! ticks of the next guard.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

/// Identity of one armed timer. Increases with every arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to an armed timer. Dropping it disarms the timer.
pub trait TimerGuard {
    fn id(&self) -> TimerId;
}

/// Something that can produce a periodic tick.
pub trait TickSource {
    type Guard: TimerGuard;

    /// Start producing ticks until the returned guard is dropped.
    fn arm(&mut self) -> Self::Guard;
}

// ============================================================================
// THREAD TICKER
// ============================================================================

/// Tick source backed by one thread per armed guard.
///
/// Each tick is delivered as `make_event(id)` on an mpsc channel, so the
/// ticker plugs into whatever event type the consumer's loop reads.
pub struct ThreadTicker<E> {
    tx: Sender<E>,
    make_event: fn(TimerId) -> E,
    period: Duration,
    next_id: u64,
}

impl<E: Send + 'static> ThreadTicker<E> {
    /// One-second ticker.
    pub fn new(tx: Sender<E>, make_event: fn(TimerId) -> E) -> Self {
        Self::with_period(tx, make_event, Duration::from_secs(1))
    }

    pub fn with_period(tx: Sender<E>, make_event: fn(TimerId) -> E, period: Duration) -> Self {
        ThreadTicker {
            tx,
            make_event,
            period,
            next_id: 0,
        }
    }
}

/// Guard for a [`ThreadTicker`] thread.
///
/// Holds the only sender of the thread's cancel channel; dropping it
/// disconnects the channel and wakes the thread, which then exits.
pub struct ThreadGuard {
    id: TimerId,
    _cancel: Sender<()>,
}

impl TimerGuard for ThreadGuard {
    fn id(&self) -> TimerId {
        self.id
    }
}

impl<E: Send + 'static> TickSource for ThreadTicker<E> {
    type Guard = ThreadGuard;

    fn arm(&mut self) -> ThreadGuard {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let tx = self.tx.clone();
        let make_event = self.make_event;
        let period = self.period;

        thread::spawn(move || {
            // Absolute deadlines: a slow consumer does not stretch the cadence.
            let mut deadline = Instant::now() + period;
            loop {
                let wait = deadline.saturating_duration_since(Instant::now());
                match cancel_rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(make_event(id)).is_err() {
                            break; // receiver dropped, consumer is shutting down
                        }
                        deadline += period;
                    }
                    // Guard dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!(timer = id.0, "ticker thread exited");
        });

        debug!(timer = id.0, "ticker armed");
        ThreadGuard {
            id,
            _cancel: cancel_tx,
        }
    }
}

// ============================================================================
// MANUAL TICKER (tests)
// ============================================================================

#[cfg(test)]
pub use manual::{ManualGuard, ManualTicker};


// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_ticker_delivers_ticks_with_guard_id() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ThreadTicker::with_period(tx, |id| id, Duration::from_millis(5));

        let guard = ticker.arm();
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, guard.id());
        assert_eq!(second, guard.id());
    }

    #[test]
    fn dropping_guard_stops_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = ThreadTicker::with_period(tx, |id| id, Duration::from_millis(5));

        let guard = ticker.arm();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        drop(guard);

        // Drain anything sent before the thread observed the cancel.
        thread::sleep(Duration::from_millis(50));
        while rx.try_recv().is_ok() {}

        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "no ticks after guard dropped");
    }

    #[test]
    fn each_arm_gets_a_fresh_id() {
        let (tx, _rx) = mpsc::channel::<TimerId>();
        let mut ticker = ThreadTicker::new(tx, |id| id);
        let a = ticker.arm();
        let b = ticker.arm();
        assert!(b.id() > a.id());
    }

    #[test]
    fn manual_ticker_tracks_live_guards() {
        let mut ticker = ManualTicker::default();
        let guard = ticker.arm();
        assert_eq!((ticker.arms(), ticker.live()), (1, 1));
        drop(guard);
        assert_eq!((ticker.arms(), ticker.live()), (1, 0));
    }
}
