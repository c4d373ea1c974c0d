//! Bounded top-k selection over scored documents.
//!
//! A min-heap of size k: insert while under capacity, then replace the
//! minimum only when the newcomer scores strictly higher. An equal score
//! never displaces a resident, and the heap's ordering makes the largest
//! docID the eviction victim among equal scores; together that means ties
//! resolve in favor of the lower docID. Draining sorts by score descending,
//! docID ascending.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// One ranked result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: u32,
    pub score: f64,
}

impl Eq for ScoredDoc {}

impl Ord for ScoredDoc {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower score is "less"; among equal scores the higher docID is
        // "less", so it sits at the heap minimum and gets evicted first.
        self.score
            .total_cmp(&other.score)
            .then(other.doc_id.cmp(&self.doc_id))
    }
}

impl PartialOrd for ScoredDoc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity collector for the k highest-scored documents.
#[derive(Debug)]
pub struct TopK {
    heap: BinaryHeap<Reverse<ScoredDoc>>,
    capacity: usize,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        TopK {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    /// Offer one candidate. Kept iff the collector is under capacity or the
    /// score strictly beats the current minimum.
    pub fn insert(&mut self, doc_id: u32, score: f64) {
        if self.capacity == 0 {
            return;
        }
        let candidate = ScoredDoc { doc_id, score };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
        } else if let Some(Reverse(min)) = self.heap.peek() {
            if candidate.score > min.score {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
            }
        }
    }

    /// Drain into rank order: score descending, docID ascending on ties.
    pub fn into_sorted(self) -> Vec<ScoredDoc> {
        let mut results: Vec<ScoredDoc> = self.heap.into_iter().map(|Reverse(d)| d).collect();
        results.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.doc_id.cmp(&b.doc_id))
        });
        results
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
