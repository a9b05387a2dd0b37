use std::ops::Range;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::TransformError;

/// Clamps a requested worker count to the hardware.
pub(crate) fn clamp_threads(requested: usize) -> usize {
    let hardware = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    requested.clamp(1, hardware)
}

/// Balanced contiguous index range for task `t` of `tasks` over `total`
/// items.
pub(crate) fn contiguous(total: usize, tasks: usize, t: usize) -> Range<usize> {
    let base = total / tasks;
    let rem = total % tasks;
    let start = t * base + t.min(rem);
    let len = base + usize::from(t < rem);
    start..start + len
}

/// Round-robin indices for task `t` of `tasks` over `total` items.
pub(crate) fn striped(total: usize, tasks: usize, t: usize) -> impl Iterator<Item = usize> {
    (t..total).step_by(tasks)
}

/// Raw view of the grid buffer handed to partition workers.
///
/// The scheduler assigns every worker a disjoint set of grid indices, so
/// the concurrent mutable views never touch the same cell.
pub(crate) struct SharedGrid {
    ptr: *mut f64,
    len: usize,
}

unsafe impl Send for SharedGrid {}
unsafe impl Sync for SharedGrid {}

impl SharedGrid {
    pub(crate) fn new(buf: &mut [f64]) -> Self {
        Self {
            ptr: buf.as_mut_ptr(),
            len: buf.len(),
        }
    }

    /// # Safety
    ///
    /// The caller must only touch indices assigned to its partition while
    /// other workers hold views of the same buffer.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn slice(&self) -> &mut [f64] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

/// Fork/join scheduler over an owned worker pool.
///
/// Every axis pass is split into at most `threads` tasks; each task
/// receives its index and a disjoint region of the shared scratch arena.
/// A panicking task marks the pass as failed, the remaining tasks run to
/// completion, and the failure surfaces after the join barrier.
pub(crate) struct PartitionScheduler {
    pool: Option<rayon::ThreadPool>,
}

impl PartitionScheduler {
    pub(crate) fn new(threads: usize) -> Result<Self, TransformError> {
        let pool = if threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|_| TransformError::ThreadPoolBuild)?;
            Some(pool)
        } else {
            None
        };

        Ok(Self { pool })
    }

    /// Runs `tasks` copies of `task`, each with a scratch region of
    /// `region` floats. A single task runs inline on the caller.
    pub(crate) fn run<F>(
        &self,
        tasks: usize,
        scratch: &mut [f64],
        region: usize,
        task: F,
    ) -> Result<(), TransformError>
    where
        F: Fn(usize, &mut [f64]) + Sync,
    {
        debug_assert!(
            scratch.len() >= tasks * region,
            "Scratch arena holds {} floats, but {} tasks need {} each",
            scratch.len(),
            tasks,
            region
        );

        let pool = match &self.pool {
            Some(pool) if tasks > 1 => pool,
            _ => {
                let end = region.min(scratch.len());
                task(0, &mut scratch[..end]);
                return Ok(());
            }
        };

        let failed = AtomicBool::new(false);
        let task = &task;

        pool.scope(|scope| {
            let mut rest = scratch;
            for t in 0..tasks {
                let (mine, tail) = rest.split_at_mut(region.min(rest.len()));
                rest = tail;
                let failed = &failed;
                scope.spawn(move |_| {
                    if catch_unwind(AssertUnwindSafe(|| task(t, mine))).is_err() {
                        failed.store(true, Ordering::Relaxed);
                    }
                });
            }
        });

        if failed.load(Ordering::Relaxed) {
            Err(TransformError::WorkerFailure)
        } else {
            Ok(())
        }
    }
}
