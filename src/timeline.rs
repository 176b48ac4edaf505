//! Deferred UI work on a virtual millisecond clock.
//!
//! Nothing runs on its own: tasks become due as the owner advances the
//! clock, which keeps fade-outs and "next tick" transitions deterministic.

/// Delay before a freshly inserted tooltip receives its shown state.
pub const SHOW_DELAY_MS: u64 = 10;
/// Fade-out interval before a hidden tooltip is detached.
pub const FADE_OUT_MS: u64 = 200;

#[derive(Debug)]
struct Scheduled<T> {
    due: u64,
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct Timeline<T> {
    now: u64,
    next_seq: u64,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queues `task` to run `delay_ms` after the current time. A zero delay
    /// still waits for the next call to [`Timeline::advance`].
    pub fn schedule(&mut self, delay_ms: u64, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due: self.now.saturating_add(delay_ms),
            seq,
            task,
        });
    }

    /// Moves the clock forward and returns every task that fell due, ordered
    /// by due time and then by scheduling order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<T> {
        self.now = self.now.saturating_add(elapsed_ms);
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|entry| entry.due <= now);
        self.pending = waiting;
        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.task).collect()
    }

    /// Runs the clock until nothing is pending.
    pub fn drain(&mut self) -> Vec<T> {
        let Some(last) = self.pending.iter().map(|entry| entry.due).max() else {
            return Vec::new();
        };
        self.advance(last.saturating_sub(self.now))
    }
}
