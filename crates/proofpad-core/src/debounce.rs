//! Settle detection for bursts of updates.
//!
//! [`Debouncer`] coalesces a rapid stream of raw updates and, once no new update has arrived for
//! the configured pause, commits exactly one value derived from the *last* update of the burst.
//!
//! Time is explicit: every call takes `now`, and the host event loop calls
//! [`Debouncer::poll`] when a deadline may have passed (see [`Debouncer::next_deadline`]).
//! Nothing blocks and nothing runs on another thread.
//!
//! Every [`Debouncer::submit`] bumps a generation counter and schedules a timer that remembers
//! the generation it was scheduled under. A newer submission supersedes the previous timer, and a
//! timer that comes due is honored only if the generation is unchanged. A timer that was already
//! due when the next submission arrives still commits first, so late polling never merges two
//! separate bursts.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Instant,
    generation: u64,
}

/// Processing function turning the last raw update into a committed value.
pub type ProcessFn<U, T> = Box<dyn FnMut(&U) -> T>;

/// Generic debounce controller.
///
/// - `U`: raw update type
/// - `T`: committed value type
pub struct Debouncer<U, T> {
    pause: Duration,
    process: ProcessFn<U, T>,
    generation: u64,
    latest: Option<U>,
    pending: bool,
    value: T,
    timer: Option<Timer>,
}

impl<U, T> fmt::Debug for Debouncer<U, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("pause", &self.pause)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .field("value", &self.value)
            .field("timer", &self.timer)
            .finish()
    }
}

impl<U, T: Clone> Debouncer<U, T> {
    /// Create a debouncer starting from `initial` as its committed value.
    pub fn new<F>(initial: T, pause: Duration, process: F) -> Self
    where
        F: FnMut(&U) -> T + 'static,
    {
        Self {
            pause,
            process: Box::new(process),
            generation: 0,
            latest: None,
            pending: false,
            value: initial,
            timer: None,
        }
    }

    /// The configured quiet period.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Current generation (number of submissions and settles so far).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `true` between a submission and the commit that settles it.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Last committed value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Record a raw update and schedule a commit `pause` after `now`.
    ///
    /// A previous burst whose pause had already elapsed at `now` is committed first and its value
    /// returned; the new update then starts a fresh burst. `now` must not go backwards between
    /// calls.
    pub fn submit(&mut self, update: U, now: Instant) -> Option<T> {
        let settled = self.poll(now);

        self.generation += 1;
        self.latest = Some(update);
        self.pending = true;

        let timer = Timer {
            due: now + self.pause,
            generation: self.generation,
        };
        if let Some(superseded) = self.timer.replace(timer) {
            trace!(
                captured = superseded.generation,
                current = self.generation,
                "debounce.discard_stale"
            );
        }

        trace!(generation = self.generation, "debounce.submit");
        settled
    }

    /// Fire the timer if it is due at `now`.
    ///
    /// Returns the committed value if the most recent submission has settled.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let timer = self.timer.filter(|t| t.due <= now)?;
        self.timer = None;

        if timer.generation != self.generation {
            trace!(
                captured = timer.generation,
                current = self.generation,
                "debounce.discard_stale"
            );
            return None;
        }

        let update = self.latest.take()?;
        let value = (self.process)(&update);
        self.value = value.clone();
        self.pending = false;
        trace!(generation = self.generation, "debounce.commit");
        Some(value)
    }

    /// Earliest instant at which [`Debouncer::poll`] may have work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.map(|t| t.due)
    }

    /// Commit `value` immediately, superseding every outstanding timer.
    ///
    /// Used when the host already knows the settled value (e.g. an initial load analyzed
    /// synchronously).
    pub fn settle(&mut self, value: T) {
        self.generation += 1;
        self.latest = None;
        self.pending = false;
        self.timer = None;
        self.value = value;
        trace!(generation = self.generation, "debounce.settle");
    }
}
