//! Time-budgeted reconciliation queue.
//!
//! Each tracked member sits in a min-heap ordered by the tick it is next
//! due. A pass pops due members until the wall-clock budget is spent;
//! whatever it does not reach stays queued for the next pass. Processed
//! members are requeued `requeue_delay` ticks later.
//!
//! Removal is lazy: the live entry for a member is identified by an
//! epoch, and heap entries with an older epoch are skipped on pop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{Clock, Member};

/// What to do with a member after processing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Requeue for a later pass.
    Keep,
    /// The member is gone; stop tracking it.
    Drop,
}

/// Summary of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Members processed and requeued.
    pub processed: usize,
    /// Members processed and dropped.
    pub dropped: usize,
    /// Due members left unprocessed when the budget ran out.
    pub remaining: usize,
    /// Wall-clock time spent in the pass.
    pub elapsed: Duration,
}

impl PassReport {
    #[must_use]
    pub fn budget_exhausted(&self) -> bool {
        self.remaining > 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Due {
    tick: u64,
    seq: u64,
    epoch: u64,
    member: Member,
}

impl Ord for Due {
    // Reversed so the max-heap pops the earliest (tick, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.tick, other.seq).cmp(&(self.tick, self.seq))
    }
}

impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Round-robin, budgeted queue of members awaiting a containment check.
#[derive(Clone, Debug, Default)]
pub struct ReconciliationScheduler {
    heap: BinaryHeap<Due>,
    live: FxHashMap<Member, u64>,
    requeue_delay: u64,
    next_seq: u64,
    next_epoch: u64,
}

impl ReconciliationScheduler {
    /// A zero delay is raised to one tick so a pass never sees the same
    /// member twice.
    #[must_use]
    pub fn new(requeue_delay: u64) -> Self {
        Self {
            requeue_delay: requeue_delay.max(1),
            ..Self::default()
        }
    }

    /// Queue a member, due at `now_tick`. Returns false if it was
    /// already queued.
    pub fn enqueue(&mut self, member: Member, now_tick: u64) -> bool {
        if self.live.contains_key(&member) {
            return false;
        }
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.live.insert(member, epoch);
        self.push(member, epoch, now_tick);
        true
    }

    /// Stop reconciling a member.
    pub fn remove(&mut self, member: Member) -> bool {
        self.live.remove(&member).is_some()
    }

    #[must_use]
    pub fn is_queued(&self, member: Member) -> bool {
        self.live.contains_key(&member)
    }

    /// Number of members being reconciled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Members due at or before `now_tick`.
    #[must_use]
    pub fn due_count(&self, now_tick: u64) -> usize {
        self.heap
            .iter()
            .filter(|due| due.tick <= now_tick && self.is_current(due))
            .count()
    }

    /// Run one pass. The budget is checked before each member, so a zero
    /// budget processes nothing.
    pub fn run_pass<F>(&mut self, now_tick: u64, budget: Duration, clock: &dyn Clock, mut process: F) -> PassReport
    where
        F: FnMut(Member) -> Outcome,
    {
        let start = clock.now();
        let mut report = PassReport::default();

        while let Some(&next) = self.heap.peek() {
            if next.tick > now_tick {
                break;
            }
            if !self.is_current(&next) {
                self.heap.pop();
                continue;
            }
            if clock.now().saturating_sub(start) >= budget {
                break;
            }
            self.heap.pop();

            match process(next.member) {
                Outcome::Keep => {
                    report.processed += 1;
                    self.push(next.member, next.epoch, now_tick + self.requeue_delay);
                }
                Outcome::Drop => {
                    report.dropped += 1;
                    self.live.remove(&next.member);
                }
            }
        }

        report.remaining = self.due_count(now_tick);
        report.elapsed = clock.now().saturating_sub(start);
        debug!(
            tick = now_tick,
            processed = report.processed,
            dropped = report.dropped,
            remaining = report.remaining,
            elapsed_us = report.elapsed.as_micros() as u64,
            "reconciliation pass"
        );
        report
    }

    fn is_current(&self, due: &Due) -> bool {
        self.live.get(&due.member) == Some(&due.epoch)
    }

    fn push(&mut self, member: Member, epoch: u64, tick: u64) {
        self.next_seq += 1;
        self.heap.push(Due {
            tick,
            seq: self.next_seq,
            epoch,
            member,
        });
    }
}
