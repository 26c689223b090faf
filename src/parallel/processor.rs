//! Range processors: the splitting disciplines.

use super::{Combiner, Splittable};
use parking_lot::Mutex;
use rayon::prelude::*;

/// Chunks scheduled per worker by [`FlatPartition::for_workers`].
pub const CHUNKS_PER_WORKER: usize = 3;

/// Process a range, possibly in parallel, and combine the per-piece results.
pub trait RangeProcessor {
    /// Run `kernel` over every piece of `work` and merge the results with
    /// `combiner`.
    fn process<W, R, K, C>(&self, work: W, kernel: &K, combiner: &C) -> R
    where
        W: Splittable,
        R: Send,
        K: Fn(W) -> R + Sync,
        C: Combiner<R>;
}

/// One kernel call on the caller's thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl RangeProcessor for Sequential {
    #[inline]
    fn process<W, R, K, C>(&self, work: W, kernel: &K, _combiner: &C) -> R
    where
        W: Splittable,
        R: Send,
        K: Fn(W) -> R + Sync,
        C: Combiner<R>,
    {
        kernel(work)
    }
}

/// Split at the midpoint until pieces are shorter than `threshold`.
///
/// Ranges of fewer than two elements are never split, so both halves of a
/// split are non-empty. For an odd length the left half gets the extra
/// element.
///
/// Halves are forked through `rayon::join` only while the worker budget has
/// room for both; once it reaches one, the remaining halves of that subtree
/// run one after the other on the same thread.
#[derive(Debug, Clone, Copy)]
pub struct RecursiveHalving {
    threshold: usize,
    workers: usize,
}

impl RecursiveHalving {
    /// Halve while `len >= threshold`, with no cap on concurrent pieces.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(2),
            workers: usize::MAX,
        }
    }

    /// Run at most `workers` pieces at the same time.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Effective sequential cut-off.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Cap on concurrently running pieces.
    pub fn workers(&self) -> usize {
        self.workers
    }

    fn recurse<W, R, K, C>(&self, work: W, budget: usize, kernel: &K, combiner: &C) -> R
    where
        W: Splittable,
        R: Send,
        K: Fn(W) -> R + Sync,
        C: Combiner<R>,
    {
        let len = work.len();
        if len < self.threshold {
            return kernel(work);
        }
        let (left, right) = work.split_at(len - len / 2);
        if budget < 2 {
            let a = self.recurse(left, 1, kernel, combiner);
            let b = self.recurse(right, 1, kernel, combiner);
            return combiner.combine(a, b);
        }
        let right_budget = budget / 2;
        let (a, b) = rayon::join(
            || self.recurse(left, budget - right_budget, kernel, combiner),
            || self.recurse(right, right_budget, kernel, combiner),
        );
        combiner.combine(a, b)
    }
}

impl RangeProcessor for RecursiveHalving {
    fn process<W, R, K, C>(&self, work: W, kernel: &K, combiner: &C) -> R
    where
        W: Splittable,
        R: Send,
        K: Fn(W) -> R + Sync,
        C: Combiner<R>,
    {
        self.recurse(work, self.workers, kernel, combiner)
    }
}

/// A fixed number of contiguous chunks drained by a bounded set of tasks.
///
/// Chunk lengths differ by at most one; the chunk count is capped at the
/// range length. Each task pulls the next unclaimed chunk until none are
/// left, so at most `workers` chunks run at the same time.
#[derive(Debug, Clone, Copy)]
pub struct FlatPartition {
    chunks: usize,
    workers: usize,
}

impl FlatPartition {
    /// Partition into `chunks` pieces, one task per piece.
    pub fn new(chunks: usize) -> Self {
        let chunks = chunks.max(1);
        Self {
            chunks,
            workers: chunks,
        }
    }

    /// [`CHUNKS_PER_WORKER`] chunks per worker, so a worker that finishes
    /// early can pick up another piece.
    pub fn for_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        Self {
            chunks: workers.saturating_mul(CHUNKS_PER_WORKER),
            workers,
        }
    }

    /// Requested chunk count.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Cap on concurrently running chunks.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl RangeProcessor for FlatPartition {
    fn process<W, R, K, C>(&self, work: W, kernel: &K, combiner: &C) -> R
    where
        W: Splittable,
        R: Send,
        K: Fn(W) -> R + Sync,
        C: Combiner<R>,
    {
        let len = work.len();
        let chunks = self.chunks.min(len).max(1);
        if chunks == 1 {
            return kernel(work);
        }

        let base = len / chunks;
        let extra = len % chunks;
        let mut pieces = Vec::with_capacity(chunks);
        let mut rest = work;
        for i in 0..chunks - 1 {
            let (head, tail) = rest.split_at(base + usize::from(i < extra));
            pieces.push(head);
            rest = tail;
        }
        pieces.push(rest);

        let tasks = self.workers.min(chunks);
        let queue = Mutex::new(pieces.into_iter());
        (0..tasks)
            .into_par_iter()
            .map(|_| {
                let mut acc = combiner.identity();
                loop {
                    let next = queue.lock().next();
                    match next {
                        Some(piece) => acc = combiner.combine(acc, kernel(piece)),
                        None => return acc,
                    }
                }
            })
            .reduce(|| combiner.identity(), |a, b| combiner.combine(a, b))
    }
}
