//! Cooperative timer queue on a virtual clock.
//!
//! Every suspension point in the page core is a timer: the typewriter's
//! character pacing and holds, the accordion's post-expand scroll delay.
//! Rather than spawning threads or relying on a host event loop, each
//! component owns a [`Timeline`] and the host drives it forward with
//! [`Timeline::pop_due`] (or the convenience [`Timeline::drain_until`]).
//!
//! ```text
//! host frame:  elapsed = 16ms
//!   component.advance(elapsed)
//!     while let Some(event) = timeline.pop_due(deadline) { handle(event) }
//!     timeline.settle(deadline)
//! ```
//!
//! Timers that come due at the same instant fire in scheduling order, and a
//! handler may schedule follow-up timers that also fall inside the same
//! advance window. That is what lets tests mock time: advancing by ten
//! seconds produces exactly the frames a real ten-second wait would.
//!
//! [`Timeline::teardown`] drops every pending timer and refuses new ones, so
//! a torn-down component can never observe a callback against dead state.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle returned by [`Timeline::schedule`], usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
pub struct Timeline<E> {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<(Duration, TimerId), E>,
    torn_down: bool,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: BTreeMap::new(),
            torn_down: false,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `event` to fire `delay` after the current virtual time.
    ///
    /// Returns `None` once the timeline has been torn down.
    pub fn schedule(&mut self, delay: Duration, event: E) -> Option<TimerId> {
        if self.torn_down {
            return None;
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), event);
        Some(id)
    }

    /// Cancel a pending timer. Returns `true` if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, k)| *k == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Number of timers still waiting to fire.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pop the earliest timer due at or before `deadline`.
    ///
    /// The clock moves to the timer's due time, so anything the caller
    /// schedules while handling the event is relative to that instant.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<E> {
        let (&(due, id), _) = self.pending.iter().next()?;
        if due > deadline {
            return None;
        }
        self.now = self.now.max(due);
        self.pending.remove(&(due, id))
    }

    /// Move the clock to `deadline` once no more timers are due.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Pop every timer due by `deadline` without re-entrant scheduling.
    ///
    /// Suitable for owners whose handlers never schedule follow-ups.
    pub fn drain_until(&mut self, deadline: Duration) -> Vec<E> {
        let mut fired = Vec::new();
        while let Some(event) = self.pop_due(deadline) {
            fired.push(event);
        }
        self.settle(deadline);
        fired
    }

    /// Drop all pending timers and refuse any further scheduling.
    pub fn teardown(&mut self) {
        self.pending.clear();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
