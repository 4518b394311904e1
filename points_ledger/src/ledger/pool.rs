//! Chronological lot pool.
//!
//! A min-heap of outstanding lots keyed by `(earned_at, sequence)`. The
//! sequence is assigned when the lot is earned, so two lots with the same
//! timestamp come out in the order they went in.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
};

use chrono::{DateTime, Utc};

use super::models::{Lot, Points};

/// Lot plus its heap ordering key
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueuedLot {
    pub(crate) earned_at: DateTime<Utc>,
    pub(crate) sequence: u64,
    pub(crate) payer: String,
    pub(crate) points: Points,
}

impl QueuedLot {
    pub(crate) fn to_lot(&self) -> Lot {
        Lot {
            payer: self.payer.clone(),
            points: self.points,
            earned_at: self.earned_at,
        }
    }
}

impl Ord for QueuedLot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.earned_at
            .cmp(&other.earned_at)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for QueuedLot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-user pool of unspent lots, oldest first
#[derive(Debug, Default)]
pub(crate) struct LotPool {
    heap: BinaryHeap<Reverse<QueuedLot>>,
    next_sequence: u64,
}

impl LotPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a freshly earned lot behind every lot already queued at the same timestamp
    pub(crate) fn push_new(&mut self, payer: String, points: Points, earned_at: DateTime<Utc>) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Reverse(QueuedLot {
            earned_at,
            sequence,
            payer,
            points,
        }));
    }

    /// Put back a lot that was taken out, keeping its original key
    pub(crate) fn restore(&mut self, lot: QueuedLot) {
        self.heap.push(Reverse(lot));
    }

    /// Remove and return the oldest lot
    pub(crate) fn pop_oldest(&mut self) -> Option<QueuedLot> {
        self.heap.pop().map(|Reverse(lot)| lot)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Sum of all outstanding points, `None` on overflow
    pub(crate) fn total_points(&self) -> Option<Points> {
        self.heap
            .iter()
            .try_fold(0 as Points, |acc, Reverse(lot)| acc.checked_add(lot.points))
    }

    /// Lots in spend order
    pub(crate) fn sorted_lots(&self) -> Vec<Lot> {
        let mut queued: Vec<&QueuedLot> = self.heap.iter().map(|Reverse(lot)| lot).collect();
        queued.sort();
        queued.into_iter().map(QueuedLot::to_lot).collect()
    }
}
