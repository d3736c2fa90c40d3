//! Virtual-time task scheduler
//!
//! Every delay in the dashboard is a task on this scheduler. The clock only
//! moves when the owner drains it, so tests step time explicitly and a run
//! with a fixed seed is fully reproducible.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    deadline: Duration,
    period: Option<Duration>,
    seq: u64,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<(Duration, u64, u64)>>,
    entries: HashMap<u64, Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once, `delay` from now
    pub fn after(&mut self, delay: Duration, task: T) -> TimerId {
        self.insert(self.now + delay, None, task)
    }

    /// Run `task` every `period`, first firing one period from now
    pub fn every(&mut self, period: Duration, task: T) -> TimerId {
        // zero would re-arm forever inside one drain
        let period = period.max(Duration::from_millis(1));
        self.insert(self.now + period, Some(period), task)
    }

    /// Drop a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.entries.remove(&id.0).is_some()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.entries.contains_key(&id.0)
    }

    /// Number of live tasks
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Pop the next task due at or before `until`, moving the clock to its
    /// deadline. Repeating tasks are re-armed before they are returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, T)> {
        while let Some(Reverse((deadline, seq, id))) = self.queue.peek().copied() {
            if deadline > until {
                return None;
            }
            self.queue.pop();

            let live = self
                .entries
                .get(&id)
                .is_some_and(|entry| entry.seq == seq);
            if !live {
                continue;
            }

            self.now = self.now.max(deadline);
            let task = match self.entries.get(&id).and_then(|e| e.period) {
                Some(period) => {
                    let seq = self.bump_seq();
                    let next = deadline + period;
                    let entry = self.entries.get_mut(&id)?;
                    entry.deadline = next;
                    entry.seq = seq;
                    self.queue.push(Reverse((next, seq, id)));
                    entry.task.clone()
                }
                None => self.entries.remove(&id)?.task,
            };
            return Some((TimerId(id), task));
        }
        None
    }

    /// Move the clock forward to `until` once nothing else is due
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, deadline: Duration, period: Option<Duration>, task: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.insert(
            id,
            Entry {
                deadline,
                period,
                seq,
                task,
            },
        );
        self.queue.push(Reverse((deadline, seq, id)));
        TimerId(id)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(s: &mut Scheduler<&'static str>, until_ms: u64) -> Vec<(u64, &'static str)> {
        let until = Duration::from_millis(until_ms);
        let mut fired = Vec::new();
        while let Some((_, task)) = s.pop_due(until) {
            fired.push((s.now().as_millis() as u64, task));
        }
        s.settle(until);
        fired
    }

    #[test]
    fn fires_in_deadline_order_then_insertion_order() {
        let mut s = Scheduler::new();
        s.after(Duration::from_millis(300), "c");
        s.after(Duration::from_millis(100), "a");
        s.after(Duration::from_millis(100), "b");

        assert_eq!(drain(&mut s, 1000), vec![(100, "a"), (100, "b"), (300, "c")]);
        assert_eq!(s.now(), Duration::from_millis(1000));
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn repeating_tasks_rearm() {
        let mut s = Scheduler::new();
        let id = s.every(Duration::from_millis(250), "tick");

        assert_eq!(drain(&mut s, 600).len(), 2);
        assert!(s.is_scheduled(id));
        assert_eq!(drain(&mut s, 1000), vec![(750, "tick"), (1000, "tick")]);
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut s = Scheduler::new();
        let once = s.after(Duration::from_millis(10), "once");
        let rep = s.every(Duration::from_millis(10), "rep");

        assert!(s.cancel(once));
        assert!(s.cancel(rep));
        assert!(!s.cancel(rep));
        assert!(drain(&mut s, 100).is_empty());
    }

    #[test]
    fn nothing_due_before_deadline() {
        let mut s = Scheduler::new();
        s.after(Duration::from_millis(500), "late");
        assert!(drain(&mut s, 499).is_empty());
        assert_eq!(drain(&mut s, 500), vec![(500, "late")]);
    }
}
