//! Contiguous range partitioning of the vertex set
//!
//! Each superstep the eligible vertices are split into one disjoint,
//! order-preserving slice per worker. Partition sizes differ by at most
//! one, with the larger partitions first, so the assignment depends only
//! on the number of items and the worker count.

use std::ops::Range;

/// Splits a sequence of items across a fixed number of workers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    workers: usize,
}

impl Partitioner {
    /// Create a partitioner for `workers` workers (at least one)
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute one range per worker covering `0..len` exactly once
    ///
    /// When `workers > len` the trailing ranges are empty.
    pub fn ranges(&self, len: usize) -> Vec<Range<usize>> {
        let base = len / self.workers;
        let extra = len % self.workers;
        let mut start = 0;
        (0..self.workers)
            .map(|worker| {
                let size = base + usize::from(worker < extra);
                let range = start..start + size;
                start += size;
                range
            })
            .collect()
    }

    /// Split `items` into disjoint mutable slices following [`Self::ranges`]
    pub fn split<'a, T>(&self, items: &'a mut [T]) -> Vec<&'a mut [T]> {
        let mut parts = Vec::with_capacity(self.workers);
        let mut rest = items;
        for range in self.ranges(rest.len()) {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            parts.push(head);
            rest = tail;
        }
        parts
    }
}
