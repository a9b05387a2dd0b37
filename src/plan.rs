use crate::error::TransformError;
use crate::partition::clamp_threads;

/// Grids with fewer total elements than this run sequentially even when
/// more than one worker is configured.
pub(crate) const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Largest number of complex columns gathered into scratch per batch.
pub(crate) const MAX_COLUMN_GROUP: usize = 4;

/// Immutable description of one transform configuration.
///
/// Holds the axis lengths, the fast-path eligibility and the worker
/// count. Everything else (strides, scratch sizing, parallel gating) is
/// derived from these values, so a transform call never has to make a
/// sizing decision on its own.
#[derive(Debug)]
pub(crate) struct ExecutionPlan {
    slices: usize,
    rows: usize,
    cols: usize,
    threads: usize,
    pow2: bool,
}

impl ExecutionPlan {
    pub(crate) fn new(slices: usize, rows: usize, cols: usize) -> Result<Self, TransformError> {
        if slices < 2 {
            return Err(TransformError::InvalidDimension {
                axis: "slices",
                len: slices,
            });
        }
        if rows < 2 {
            return Err(TransformError::InvalidDimension {
                axis: "rows",
                len: rows,
            });
        }
        if cols < 2 {
            return Err(TransformError::InvalidDimension {
                axis: "cols",
                len: cols,
            });
        }

        let pow2 = slices.is_power_of_two() && rows.is_power_of_two() && cols.is_power_of_two();

        Ok(Self {
            slices,
            rows,
            cols,
            threads: 1,
            pow2,
        })
    }

    #[inline(always)]
    pub(crate) fn slices(&self) -> usize {
        self.slices
    }

    #[inline(always)]
    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    #[inline(always)]
    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub(crate) fn threads(&self) -> usize {
        self.threads
    }

    #[inline(always)]
    pub(crate) fn pow2(&self) -> bool {
        self.pow2
    }

    pub(crate) fn total(&self) -> usize {
        self.slices * self.rows * self.cols
    }

    /// Clamps the requested worker count to the hardware.
    pub(crate) fn set_threads(&mut self, requested: usize) {
        self.threads = clamp_threads(requested);
    }

    pub(crate) fn parallel(&self) -> bool {
        self.threads > 1 && self.total() >= PARALLEL_THRESHOLD
    }

    /// Scratch floats one worker needs for the batched axis passes.
    ///
    /// A batch holds up to [`MAX_COLUMN_GROUP`] complex columns of the
    /// longest strided axis. With only two data columns at most two
    /// complex columns can ever form a batch, halving the requirement.
    /// The fallback path gathers into per-call line buffers instead and
    /// needs no shared scratch at all.
    pub(crate) fn scratch_region(&self) -> usize {
        if !self.pow2 {
            return 0;
        }
        let line = self.slices.max(self.rows);
        if self.cols == 2 {
            4 * line
        } else {
            8 * line
        }
    }
}
