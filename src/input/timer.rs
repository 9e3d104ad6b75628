// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic timers for the input state machine.
//!
//! Timers never fire on their own. The owner asks [`TimerQueue::pop_due`]
//! for expired timers with an explicit `now`, and asks
//! [`TimerQueue::next_deadline`] when it should come back. This keeps the
//! state machine single-threaded and lets tests drive time by hand.
//!
//! Every scheduled timer is identified by a [`ScheduledTask`] handle.
//! Cancelling is idempotent: cancelling a handle that already fired or was
//! already cancelled does nothing, and a cancelled handle never comes out of
//! `pop_due`.

use std::time::{Duration, Instant};

/// The timers used by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Shift double-tap window
    ShiftToggle,
    /// Hold time before backspace starts repeating
    BackspaceRepeatDelay,
    /// Backspace auto-repeat
    BackspaceRepeat,
    /// Hold time before a key menu opens
    KeyMenuOpen,
}

/// Handle to a scheduled timer.
#[must_use = "a timer that is never cancelled keeps firing"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledTask {
    id: u64,
    kind: TimerKind,
}

impl ScheduledTask {
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Cancels the timer. Safe to call on a fired or cancelled handle.
    pub fn cancel(self, queue: &mut TimerQueue) {
        queue.cancel(self);
    }
}

#[derive(Debug, Clone)]
struct Entry {
    task: ScheduledTask,
    deadline: Instant,
    period: Option<Duration>,
}

/// A small queue of one-shot and repeating timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a one-shot timer firing `delay` after `now`.
    pub fn schedule(&mut self, kind: TimerKind, now: Instant, delay: Duration) -> ScheduledTask {
        self.push(kind, now + delay, None)
    }

    /// Schedules a timer firing every `period`, first at `now + period`.
    pub fn schedule_repeating(
        &mut self,
        kind: TimerKind,
        now: Instant,
        period: Duration,
    ) -> ScheduledTask {
        self.push(kind, now + period, Some(period))
    }

    fn push(
        &mut self,
        kind: TimerKind,
        deadline: Instant,
        period: Option<Duration>,
    ) -> ScheduledTask {
        self.next_id += 1;
        let task = ScheduledTask {
            id: self.next_id,
            kind,
        };
        self.entries.push(Entry {
            task,
            deadline,
            period,
        });
        tracing::trace!(?kind, id = task.id, "timer scheduled");
        task
    }

    /// Cancels a timer. No-op if it already fired or was cancelled.
    pub fn cancel(&mut self, task: ScheduledTask) {
        self.entries.retain(|entry| entry.task != task);
    }

    /// Cancels the timer in `slot`, if any, and empties the slot.
    pub fn cancel_slot(&mut self, slot: &mut Option<ScheduledTask>) {
        if let Some(task) = slot.take() {
            self.cancel(task);
        }
    }

    /// Returns `true` if the timer is still pending.
    pub fn is_scheduled(&self, task: ScheduledTask) -> bool {
        self.entries.iter().any(|entry| entry.task == task)
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.deadline).min()
    }

    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Repeating timers stay queued with their deadline advanced by one
    /// period, so calling this in a loop catches up on every missed tick.
    pub fn pop_due(&mut self, now: Instant) -> Option<ScheduledTask> {
        self.pop_expired(now).map(|(task, _)| task)
    }

    /// Like [`TimerQueue::pop_due`], also returning the deadline the timer
    /// fired for. Work chained off a late timer should start from this
    /// deadline rather than from `now`.
    pub fn pop_expired(&mut self, now: Instant) -> Option<(ScheduledTask, Instant)> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= now)
            .min_by_key(|(_, entry)| (entry.deadline, entry.task.id))?;

        let entry = &mut self.entries[index];
        let task = entry.task;
        let deadline = entry.deadline;
        match entry.period {
            Some(period) => entry.deadline += period,
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some((task, deadline))
    }

    /// Cancels everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
