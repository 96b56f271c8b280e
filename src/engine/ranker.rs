//! Venue ranking by descending score.
//!
//! Two interchangeable strategies share one typed ordering ([`by_score_desc`]):
//!
//! - [`PartitionRanker`]: pattern-defeating quicksort (`sort_unstable_by`),
//!   O(n log n) on average.
//! - [`HeapRanker`]: explicit max-heap sort. The heap is built in O(n), the
//!   best venue is extracted to the tail in O(log n) per step and the
//!   ascending result is reversed.
//!
//! Neither strategy is stable. Venues with exactly equal scores may come out
//! in any order and the two strategies may disagree on it; only the sequence
//! of scores is guaranteed to match.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::engine::types::{Venue, VenueSet};

/// `Less` when `a` ranks ahead of `b`, i.e. has the higher score.
pub fn by_score_desc(a: &Venue, b: &Venue) -> Ordering {
    OrderedFloat(b.score).cmp(&OrderedFloat(a.score))
}

pub trait Ranker: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reorder in place, best venue first.
    fn sort(&self, venues: &mut [Venue]);

    fn rank(&self, mut venues: VenueSet) -> VenueSet {
        self.sort(venues.as_mut_slice());
        venues
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PartitionRanker;

impl Ranker for PartitionRanker {
    fn name(&self) -> &'static str {
        "partition"
    }

    fn sort(&self, venues: &mut [Venue]) {
        venues.sort_unstable_by(by_score_desc);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeapRanker;

impl Ranker for HeapRanker {
    fn name(&self) -> &'static str {
        "heap"
    }

    fn sort(&self, venues: &mut [Venue]) {
        let n = venues.len();
        for root in (0..n / 2).rev() {
            sift_down(venues, root, n);
        }
        // move the current best to the tail, shrink the heap, repeat
        for end in (1..n).rev() {
            venues.swap(0, end);
            sift_down(venues, 0, end);
        }
        venues.reverse();
    }
}

// Restore the max-heap property below `root` within venues[..len].
fn sift_down(venues: &mut [Venue], mut root: usize, len: usize) {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut best = root;
        if left < len && by_score_desc(&venues[left], &venues[best]) == Ordering::Less {
            best = left;
        }
        if right < len && by_score_desc(&venues[right], &venues[best]) == Ordering::Less {
            best = right;
        }
        if best == root {
            return;
        }
        venues.swap(root, best);
        root = best;
    }
}

/// Selectable ranking strategy (CLI / config facing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RankingStrategy {
    #[default]
    Partition,
    Heap,
}

impl Ranker for RankingStrategy {
    fn name(&self) -> &'static str {
        match self {
            RankingStrategy::Partition => PartitionRanker.name(),
            RankingStrategy::Heap => HeapRanker.name(),
        }
    }

    fn sort(&self, venues: &mut [Venue]) {
        match self {
            RankingStrategy::Partition => PartitionRanker.sort(venues),
            RankingStrategy::Heap => HeapRanker.sort(venues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(scores: &[f64]) -> Vec<Venue> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let mut v = Venue::new(&format!("V{}", i), 100.0, 1.0, 10);
                v.score = *s;
                v
            })
            .collect()
    }

    fn score_seq(venues: &[Venue]) -> Vec<f64> {
        venues.iter().map(|v| v.score).collect()
    }

    #[test]
    fn test_comparator_descending() {
        let v = scored(&[0.2, 0.9]);
        assert_eq!(by_score_desc(&v[1], &v[0]), Ordering::Less);
        assert_eq!(by_score_desc(&v[0], &v[1]), Ordering::Greater);
        assert_eq!(by_score_desc(&v[0], &v[0]), Ordering::Equal);
    }

    #[test]
    fn test_partition_sort() {
        let mut v = scored(&[0.3, 0.8, 0.1, 0.5]);
        PartitionRanker.sort(&mut v);
        assert_eq!(score_seq(&v), vec![0.8, 0.5, 0.3, 0.1]);
    }

    #[test]
    fn test_heap_sort() {
        let mut v = scored(&[0.3, 0.8, 0.1, 0.5, 0.9, 0.0, 0.4]);
        HeapRanker.sort(&mut v);
        assert_eq!(score_seq(&v), vec![0.9, 0.8, 0.5, 0.4, 0.3, 0.1, 0.0]);
    }

    #[test]
    fn test_heap_sort_trivial_lengths() {
        let mut empty: Vec<Venue> = vec![];
        HeapRanker.sort(&mut empty);
        assert!(empty.is_empty());

        let mut one = scored(&[0.4]);
        HeapRanker.sort(&mut one);
        assert_eq!(score_seq(&one), vec![0.4]);

        let mut two = scored(&[0.1, 0.7]);
        HeapRanker.sort(&mut two);
        assert_eq!(score_seq(&two), vec![0.7, 0.1]);
    }

    #[test]
    fn test_strategies_agree_with_ties() {
        let scores = [0.5, 0.2, 0.5, 0.9, 0.2, 0.5];
        let mut a = scored(&scores);
        let mut b = scored(&scores);
        RankingStrategy::Partition.sort(&mut a);
        RankingStrategy::Heap.sort(&mut b);
        assert_eq!(score_seq(&a), score_seq(&b));
        assert_eq!(a[0].identifier, "V3");
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(RankingStrategy::Partition.name(), "partition");
        assert_eq!(RankingStrategy::Heap.name(), "heap");
        assert_eq!(RankingStrategy::default(), RankingStrategy::Partition);
    }
}
