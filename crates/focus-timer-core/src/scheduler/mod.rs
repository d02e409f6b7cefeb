//! Deferred-work scheduling for the timer engine.
//!
//! The engine never sleeps or spawns. It registers jobs with a [`Scheduler`]
//! and whoever drives the engine (a tokio loop, a test advancing a
//! [`ManualClock`](crate::clock::ManualClock)) pops the due jobs back and
//! hands them to [`TimerEngine::run_due`](crate::TimerEngine::run_due).
//!
//! ```text
//! engine.start()  -> schedule_every(now + 1000, 1000, Tick)
//! engine.tick()   -> schedule(now + 5000, FlushStats)     (if none pending)
//! engine.complete -> schedule(now + 1000, AdvanceMode)
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Handle returned by the scheduler, used to cancel a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// Work the engine can defer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    /// One-second countdown step.
    Tick,
    /// Coalesced stats write.
    FlushStats,
    /// Move to the next mode after a completion.
    AdvanceMode,
}

pub trait Scheduler {
    /// Queue `job` to fire once at `due_ms` (epoch milliseconds).
    fn schedule(&mut self, due_ms: u64, job: Job) -> TimerId;

    /// Queue `job` to fire at `due_ms` and then every `period_ms` until cancelled.
    fn schedule_every(&mut self, due_ms: u64, period_ms: u64, job: Job) -> TimerId;

    /// Cancelling an unknown or already-fired id is a no-op.
    fn cancel(&mut self, id: TimerId);

    /// Earliest due time, if anything is queued.
    fn next_due(&self) -> Option<u64>;

    /// Remove and return the earliest job due at or before `now_ms`,
    /// together with the instant it was due.
    fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Job)>;
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    job: Job,
    period_ms: Option<u64>,
}

/// In-memory timer queue ordered by due time, then by insertion order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    next_seq: u64,
    entries: BTreeMap<(u64, u64), Entry>,
    index: HashMap<TimerId, (u64, u64)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    fn insert(&mut self, id: TimerId, due_ms: u64, job: Job, period_ms: Option<u64>) {
        let key = (due_ms, self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, Entry { id, job, period_ms });
        self.index.insert(id, key);
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, due_ms: u64, job: Job) -> TimerId {
        let id = self.allocate_id();
        self.insert(id, due_ms, job, None);
        id
    }

    fn schedule_every(&mut self, due_ms: u64, period_ms: u64, job: Job) -> TimerId {
        let id = self.allocate_id();
        self.insert(id, due_ms, job, Some(period_ms.max(1)));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(key) = self.index.remove(&id) {
            self.entries.remove(&key);
        }
    }

    fn next_due(&self) -> Option<u64> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Job)> {
        let (&key, _) = self.entries.iter().next()?;
        if key.0 > now_ms {
            return None;
        }
        let entry = self.entries.remove(&key)?;
        self.index.remove(&entry.id);
        if let Some(period) = entry.period_ms {
            self.insert(entry.id, key.0.saturating_add(period), entry.job, Some(period));
        }
        Some((key.0, entry.job))
    }
}
