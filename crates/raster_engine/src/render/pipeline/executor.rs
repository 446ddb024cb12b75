//! Parallel batch executor
//!
//! Every pipeline stage is a batch of independent work items with no
//! communication between siblings. The executor runs one batch at a time on
//! scoped worker threads and returns only after every item has completed,
//! so each call doubles as the full-batch barrier between stages.
//!
//! Two dispatch shapes cover the four stages:
//! - [`Executor::run_chunked`] hands each worker a disjoint contiguous slice
//!   of the output array. Used where work per item is uniform and the stage
//!   writes one slot per item (vertex transform, primitive assembly,
//!   fragment shading).
//! - [`Executor::run_indexed`] lets workers claim small index batches from a
//!   shared atomic cursor. Used for rasterization, where per-triangle cost
//!   varies with covered area and static chunking would idle workers.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Indices claimed per cursor increment in [`Executor::run_indexed`]
const CLAIM_BATCH: usize = 16;

/// Scoped-thread batch executor for the pipeline stages
#[derive(Debug, Clone)]
pub(crate) struct Executor {
    workers: usize,
}

impl Executor {
    /// Create an executor with the requested worker count
    ///
    /// A count of zero selects the machine's available parallelism.
    pub(crate) fn new(requested: usize) -> Self {
        let workers = if requested == 0 {
            thread::available_parallelism().map_or(1, NonZeroUsize::get)
        } else {
            requested
        };
        Self { workers }
    }

    /// Number of workers batches are spread across
    pub(crate) fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run `task` over disjoint contiguous chunks of `items`
    ///
    /// The closure receives each chunk's starting index in `items` together
    /// with the chunk itself. Returns after all chunks complete.
    pub(crate) fn run_chunked<T, F>(&self, items: &mut [T], task: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        let worker_count = self.workers.min(items.len());
        if worker_count <= 1 {
            task(0, items);
            return;
        }

        let chunk_size = items.len().div_ceil(worker_count);
        thread::scope(|scope| {
            for (chunk_index, chunk) in items.chunks_mut(chunk_size).enumerate() {
                let task = &task;
                scope.spawn(move || task(chunk_index * chunk_size, chunk));
            }
        });
    }

    /// Run `task` once for every index in `0..count`, dynamically balanced
    ///
    /// Workers repeatedly claim [`CLAIM_BATCH`] indices from a shared cursor
    /// until the range is exhausted. Returns after all indices complete.
    pub(crate) fn run_indexed<F>(&self, count: usize, task: F)
    where
        F: Fn(usize) + Sync,
    {
        if self.workers <= 1 || count <= CLAIM_BATCH {
            for index in 0..count {
                task(index);
            }
            return;
        }

        let cursor = AtomicUsize::new(0);
        let worker_count = self.workers.min(count.div_ceil(CLAIM_BATCH));
        thread::scope(|scope| {
            for _ in 0..worker_count {
                let cursor = &cursor;
                let task = &task;
                scope.spawn(move || loop {
                    let start = cursor.fetch_add(CLAIM_BATCH, Ordering::Relaxed);
                    if start >= count {
                        break;
                    }
                    let end = (start + CLAIM_BATCH).min(count);
                    for index in start..end {
                        task(index);
                    }
                });
            }
        });
    }
}
