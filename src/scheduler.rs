//! Deterministic virtual-time timer queue.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::reveal::TimerId;

/// Timer queue driven by explicit `advance` calls instead of wall time.
///
/// Timers with the same deadline fire in scheduling order.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Duration,
    seq: u64,
    queue: BTreeMap<(Duration, u64), TimerId>,
    index: HashMap<TimerId, (Duration, u64)>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedule `timer` to fire `after` from now. Rescheduling an id replaces
    /// its previous deadline.
    pub fn schedule(&mut self, timer: TimerId, after: Duration) {
        self.cancel(timer);
        self.seq += 1;
        let key = (self.now + after, self.seq);
        self.queue.insert(key, timer);
        self.index.insert(timer, key);
    }

    /// Returns `false` if the timer was not pending.
    pub fn cancel(&mut self, timer: TimerId) -> bool {
        match self.index.remove(&timer) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        self.queue.clear();
        self.index.clear();
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (&key, _) = self.queue.iter().next()?;
        if key.0 > until {
            return None;
        }
        let timer = self.queue.remove(&key)?;
        self.index.remove(&timer);
        self.now = self.now.max(key.0);
        Some(timer)
    }

    /// Move the clock forward without firing anything.
    pub fn settle(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }

    /// Advance by `by`, returning every timer that came due in order.
    ///
    /// Timers scheduled by the caller while handling the returned ids are not
    /// included; hosts that react to timers should loop on [`pop_due`](Self::pop_due).
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let target = self.now + by;
        let mut fired = Vec::new();
        while let Some(t) = self.pop_due(target) {
            fired.push(t);
        }
        self.settle(target);
        fired
    }
}
