//! Deferred one-shot tasks on the game clock.
//!
//! The clock advances by the scaled tick length, so slow motion stretches
//! every pending delay uniformly. Tasks name their target by identifier and
//! the world drops them silently when that target no longer exists.
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::entity::EntityId;
use crate::particles::BurstId;

/// Work to perform once a delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// The weapon of this entity finished its cooldown.
    WeaponReady(EntityId),
    /// Re-trigger an armed automatic weapon.
    AutoFire(EntityId),
    /// Refill the magazine of this entity's weapon.
    ReloadDone(EntityId),
    /// End slow motion.
    RestoreTimescale,
    /// Remove a particle burst.
    ExpireParticles(BurstId),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    task: Task,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due_ms
            .total_cmp(&other.due_ms)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Game clock plus the queue of pending tasks.
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    now_ms: f64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
}

impl Scheduler {
    /// Creates a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current game time in milliseconds.
    #[must_use]
    pub const fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Queues `task` to run once `delay_ms` of game time has passed.
    ///
    /// Negative or non-finite delays run on the next advance.
    pub fn schedule(&mut self, delay_ms: f32, task: Task) {
        let delay = if delay_ms.is_finite() {
            f64::from(delay_ms.max(0.0))
        } else {
            0.0
        };
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled {
            due_ms: self.now_ms + delay,
            seq,
            task,
        }));
    }

    /// Moves the clock forward and returns every task now due, oldest first.
    ///
    /// # Examples
    /// ```
    /// use runngun::schedule::{Scheduler, Task};
    /// let mut scheduler = Scheduler::new();
    /// scheduler.schedule(10.0, Task::RestoreTimescale);
    /// assert!(scheduler.advance(5.0).is_empty());
    /// assert_eq!(scheduler.advance(5.0), vec![Task::RestoreTimescale]);
    /// ```
    pub fn advance(&mut self, delta_ms: f32) -> Vec<Task> {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.now_ms += f64::from(delta_ms);
        }
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.due_ms > self.now_ms {
                break;
            }
            if let Some(Reverse(item)) = self.queue.pop() {
                due.push(item.task);
            }
        }
        due
    }

    /// Number of tasks still waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether any pending task matches `predicate`.
    #[must_use]
    pub fn any_pending(&self, mut predicate: impl FnMut(&Task) -> bool) -> bool {
        self.queue.iter().any(|Reverse(item)| predicate(&item.task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn tasks_fire_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(30.0, Task::ReloadDone(EntityId(1)));
        scheduler.schedule(10.0, Task::WeaponReady(EntityId(1)));
        scheduler.schedule(20.0, Task::AutoFire(EntityId(1)));
        assert_eq!(
            scheduler.advance(30.0),
            vec![
                Task::WeaponReady(EntityId(1)),
                Task::AutoFire(EntityId(1)),
                Task::ReloadDone(EntityId(1)),
            ]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn equal_due_times_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5.0, Task::AutoFire(EntityId(2)));
        scheduler.schedule(5.0, Task::WeaponReady(EntityId(2)));
        assert_eq!(
            scheduler.advance(5.0),
            vec![Task::AutoFire(EntityId(2)), Task::WeaponReady(EntityId(2))]
        );
    }

    #[rstest]
    #[case::negative(-4.0)]
    #[case::nan(f32::NAN)]
    fn degenerate_delays_run_immediately(#[case] delay: f32) {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(delay, Task::RestoreTimescale);
        assert_eq!(scheduler.advance(0.0), vec![Task::RestoreTimescale]);
    }

    #[test]
    fn pending_tasks_can_be_searched() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(50.0, Task::ReloadDone(EntityId(3)));
        assert!(scheduler.any_pending(|t| matches!(t, Task::ReloadDone(EntityId(3)))));
        assert!(!scheduler.any_pending(|t| *t == Task::RestoreTimescale));
        scheduler.advance(50.0);
        assert!(!scheduler.any_pending(|_| true));
    }

    #[test]
    fn clock_accumulates_scaled_ticks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(600.0, Task::RestoreTimescale);
        let tick = 1000.0 / 60.0 * 0.33;
        let mut ticks = 0;
        while scheduler.advance(tick).is_empty() {
            ticks += 1;
        }
        assert!(ticks > 100, "slow motion ended after {ticks} ticks");
        assert!(scheduler.now_ms() >= 600.0);
    }
}
