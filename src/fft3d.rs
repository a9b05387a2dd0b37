use std::sync::Arc;

use crate::axis;
use crate::error::TransformError;
use crate::kernel::LineKernel;
use crate::partition::{self, PartitionScheduler, SharedGrid};
use crate::plan::ExecutionPlan;
use crate::symmetry;

/// 3-D discrete Fourier transforms of volumetric `f64` data.
///
/// Data lives in flat row-major buffers: the column index varies
/// fastest, then rows, then slices. Complex buffers interleave real and
/// imaginary parts, so a `slices x rows x cols` grid spans
/// `2 * slices * rows * cols` values.
///
/// A transform instance precomputes the per-axis kernels and an
/// execution plan at construction and reuses them for every call. The
/// worker count is part of the plan; change it with [`Self::reconfigure`].
/// Transforms take `&mut self`, so an instance never runs two transforms
/// at once.
pub struct Fft3d {
    plan: ExecutionPlan,
    scheduler: PartitionScheduler,
    scratch: Vec<f64>,
    slice_kernel: Arc<LineKernel>,
    row_kernel: Arc<LineKernel>,
    col_kernel: Arc<LineKernel>,
}

impl Fft3d {
    /// Creates a transform for a `slices x rows x cols` grid.
    ///
    /// Every axis must be at least 2. The instance starts out
    /// single-threaded.
    pub fn new(slices: usize, rows: usize, cols: usize) -> Result<Self, TransformError> {
        let plan = ExecutionPlan::new(slices, rows, cols)?;
        let scheduler = PartitionScheduler::new(plan.threads())?;

        let slice_kernel = Arc::new(LineKernel::new(slices));
        let row_kernel = if rows == slices {
            slice_kernel.clone()
        } else {
            Arc::new(LineKernel::new(rows))
        };
        let col_kernel = if cols == slices {
            slice_kernel.clone()
        } else if cols == rows {
            row_kernel.clone()
        } else {
            Arc::new(LineKernel::new(cols))
        };

        let scratch = vec![0.0; plan.threads() * plan.scratch_region()];

        Ok(Self {
            plan,
            scheduler,
            scratch,
            slice_kernel,
            row_kernel,
            col_kernel,
        })
    }

    /// Changes the worker count and rebuilds the pool and scratch arena.
    ///
    /// The request is clamped to the hardware. A request that clamps to
    /// the current count leaves the pool and scratch untouched; this is
    /// otherwise the only point where scratch is ever resized, and
    /// transform calls never reallocate.
    pub fn reconfigure(&mut self, threads: usize) -> Result<(), TransformError> {
        if partition::clamp_threads(threads) == self.plan.threads() {
            return Ok(());
        }
        self.plan.set_threads(threads);
        self.scheduler = PartitionScheduler::new(self.plan.threads())?;
        self.scratch.clear();
        self.scratch
            .resize(self.plan.threads() * self.plan.scratch_region(), 0.0);
        Ok(())
    }

    /// Slice-axis length of the grid.
    pub fn slices(&self) -> usize {
        self.plan.slices()
    }

    /// Row-axis length of the grid.
    pub fn rows(&self) -> usize {
        self.plan.rows()
    }

    /// Column-axis length of the grid.
    pub fn cols(&self) -> usize {
        self.plan.cols()
    }

    /// Configured worker count.
    pub fn threads(&self) -> usize {
        self.plan.threads()
    }

    /// Forward transform of a complex grid, in place.
    ///
    /// `a` holds `2 * slices * rows * cols` interleaved values.
    pub fn complex_forward(&mut self, a: &mut [f64]) -> Result<(), TransformError> {
        self.check_len(a, 2 * self.plan.total())?;
        self.complex_transform(a, false, false)
    }

    /// Inverse transform of a complex grid, in place.
    ///
    /// With `scale` the result is divided by the number of grid points,
    /// making it the exact inverse of [`Self::complex_forward`].
    pub fn complex_inverse(&mut self, a: &mut [f64], scale: bool) -> Result<(), TransformError> {
        self.check_len(a, 2 * self.plan.total())?;
        self.complex_transform(a, true, scale)
    }

    /// Forward transform of a real grid into the packed half-spectrum,
    /// in place. Requires power-of-two axis lengths.
    ///
    /// `a` holds `slices * rows * cols` values. On return, cell
    /// `(s, r, 2k)`/`(s, r, 2k + 1)` holds `Re/Im X[s][r][k]` for
    /// `0 < k < cols / 2`. The remaining bins are folded into the first
    /// two cells of each row: for `0 < r < rows / 2` cell `(s, r, 0..2)`
    /// holds `X[s][r][0]` while `((slices - s) % slices, rows - r, 0..2)`
    /// holds `(-Im, Re)` of `X[s][r][cols / 2]`; rows `0` and `rows / 2`
    /// fold the same way along the slice axis, and the four remaining
    /// cells pair the purely real corner bins.
    pub fn real_forward(&mut self, a: &mut [f64]) -> Result<(), TransformError> {
        self.require_pow2()?;
        self.check_len(a, self.plan.total())?;

        let (s, r, c) = self.dims();
        let rs = c;
        let ss = r * c;

        let col = self.col_kernel.clone();
        self.run_direct(a, s * r, rs, move |b, off| col.real_forward(b, off))?;

        let row = self.row_kernel.clone();
        self.run_batched(a, s, ss, r, rs, c / 2, move |b, off| {
            row.complex_forward(b, off)
        })?;

        let slice = self.slice_kernel.clone();
        self.run_batched(a, r, rs, s, ss, c / 2, move |b, off| {
            slice.complex_forward(b, off)
        })?;

        self.untangle(a, true)
    }

    /// Inverse of [`Self::real_forward`], in place.
    ///
    /// With `scale` the packed round trip is exact; without it the
    /// result carries the conventional factor
    /// `slices * rows * cols / 2`.
    pub fn real_inverse(&mut self, a: &mut [f64], scale: bool) -> Result<(), TransformError> {
        self.require_pow2()?;
        self.check_len(a, self.plan.total())?;

        let (s, r, c) = self.dims();
        let rs = c;
        let ss = r * c;

        self.untangle(a, false)?;

        let slice = self.slice_kernel.clone();
        self.run_batched(a, r, rs, s, ss, c / 2, move |b, off| {
            slice.complex_inverse(b, off, scale)
        })?;

        let row = self.row_kernel.clone();
        self.run_batched(a, s, ss, r, rs, c / 2, move |b, off| {
            row.complex_inverse(b, off, scale)
        })?;

        let col = self.col_kernel.clone();
        self.run_direct(a, s * r, rs, move |b, off| col.real_inverse(b, off, scale))
    }

    /// Forward transform of a real grid into the full complex spectrum,
    /// in place.
    ///
    /// The real data occupies the first `slices * rows * cols` values of
    /// `a`, which must span twice that. Power-of-two grids run the
    /// packed pipeline and expand it; other grids transform the stored
    /// half of the column bins and mirror the rest.
    pub fn real_forward_full(&mut self, a: &mut [f64]) -> Result<(), TransformError> {
        self.check_len(a, 2 * self.plan.total())?;

        if self.plan.pow2() {
            self.real_forward(a)?;
            let (s, r, c) = self.dims();
            symmetry::fill_symmetric(a, s, r, c);
            Ok(())
        } else {
            self.full_transform(a, false, false)
        }
    }

    /// Inverse transform of a real grid into the full complex spectrum,
    /// in place. Layout as in [`Self::real_forward_full`]; with `scale`
    /// every bin is divided by the number of grid points.
    pub fn real_inverse_full(&mut self, a: &mut [f64], scale: bool) -> Result<(), TransformError> {
        self.check_len(a, 2 * self.plan.total())?;

        if !self.plan.pow2() {
            return self.full_transform(a, true, scale);
        }

        let (s, r, c) = self.dims();
        let rs = c;
        let ss = r * c;

        let col = self.col_kernel.clone();
        self.run_direct(a, s * r, rs, move |b, off| col.real_inverse2(b, off, scale))?;

        let row = self.row_kernel.clone();
        self.run_batched(a, s, ss, r, rs, c / 2, move |b, off| {
            row.complex_inverse(b, off, scale)
        })?;

        let slice = self.slice_kernel.clone();
        self.run_batched(a, r, rs, s, ss, c / 2, move |b, off| {
            slice.complex_inverse(b, off, scale)
        })?;

        // The result is a packed forward-format spectrum of the inverse
        // transform; expand it like the forward one.
        self.untangle(a, true)?;
        symmetry::fill_symmetric(a, s, r, c);
        Ok(())
    }

    fn dims(&self) -> (usize, usize, usize) {
        (self.plan.slices(), self.plan.rows(), self.plan.cols())
    }

    fn check_len(&self, a: &[f64], required: usize) -> Result<(), TransformError> {
        if a.len() < required {
            return Err(TransformError::BufferSize {
                required,
                actual: a.len(),
            });
        }
        Ok(())
    }

    fn require_pow2(&self) -> Result<(), TransformError> {
        let bad = [self.plan.slices(), self.plan.rows(), self.plan.cols()]
            .into_iter()
            .find(|len| !len.is_power_of_two());
        match bad {
            Some(len) => Err(TransformError::UnsupportedAxisLength { len }),
            None => Ok(()),
        }
    }

    fn tasks_for(&self, domain: usize) -> usize {
        if self.plan.parallel() {
            self.plan.threads().min(domain)
        } else {
            1
        }
    }

    /// Contiguous-line pass over `domain` lines of stride `stride`.
    fn run_direct<F>(
        &mut self,
        a: &mut [f64],
        domain: usize,
        stride: usize,
        op: F,
    ) -> Result<(), TransformError>
    where
        F: Fn(&mut [f64], usize) + Sync,
    {
        let tasks = self.tasks_for(domain);
        let region = self.plan.scratch_region();
        let grid = SharedGrid::new(a);
        let op = &op;
        self.scheduler
            .run(tasks, &mut self.scratch, region, move |t, _scratch| {
                // SAFETY: tasks own disjoint contiguous ranges of lines.
                let buf = unsafe { grid.slice() };
                axis::direct_pass(buf, partition::contiguous(domain, tasks, t), stride, op);
            })
    }

    /// Batched strided pass; outer indices are striped across tasks.
    #[allow(clippy::too_many_arguments)]
    fn run_batched<F>(
        &mut self,
        a: &mut [f64],
        outer_count: usize,
        outer_stride: usize,
        line_len: usize,
        line_stride: usize,
        ncols: usize,
        op: F,
    ) -> Result<(), TransformError>
    where
        F: Fn(&mut [f64], usize) + Sync,
    {
        let tasks = self.tasks_for(outer_count);
        let region = self.plan.scratch_region();
        let grid = SharedGrid::new(a);
        let op = &op;
        self.scheduler
            .run(tasks, &mut self.scratch, region, move |t, scratch| {
                // SAFETY: tasks own disjoint striped sets of outer indices.
                let buf = unsafe { grid.slice() };
                axis::batched_pass(
                    buf,
                    partition::striped(outer_count, tasks, t),
                    outer_stride,
                    line_len,
                    line_stride,
                    ncols,
                    scratch,
                    op,
                );
            })
    }

    /// Column-at-a-time strided pass for the fallback path.
    #[allow(clippy::too_many_arguments)]
    fn run_gathered<F>(
        &mut self,
        a: &mut [f64],
        outer_count: usize,
        outer_stride: usize,
        line_len: usize,
        line_stride: usize,
        ncols: usize,
        op: F,
    ) -> Result<(), TransformError>
    where
        F: Fn(&mut [f64], usize) + Sync,
    {
        let tasks = self.tasks_for(outer_count);
        let grid = SharedGrid::new(a);
        let op = &op;
        self.scheduler
            .run(tasks, &mut self.scratch, 0, move |t, _scratch| {
                // SAFETY: tasks own disjoint contiguous sets of outer indices.
                let buf = unsafe { grid.slice() };
                axis::gathered_pass(
                    buf,
                    partition::contiguous(outer_count, tasks, t),
                    outer_stride,
                    line_len,
                    line_stride,
                    ncols,
                    op,
                );
            })
    }

    fn complex_transform(
        &mut self,
        a: &mut [f64],
        inverse: bool,
        scale: bool,
    ) -> Result<(), TransformError> {
        let (s, r, c) = self.dims();
        let rs = 2 * c;
        let ss = r * rs;

        let col = self.col_kernel.clone();
        self.run_direct(a, s * r, rs, move |b, off| {
            if inverse {
                col.complex_inverse(b, off, scale)
            } else {
                col.complex_forward(b, off)
            }
        })?;

        let row = self.row_kernel.clone();
        let row_op = move |b: &mut [f64], off: usize| {
            if inverse {
                row.complex_inverse(b, off, scale)
            } else {
                row.complex_forward(b, off)
            }
        };
        let slice = self.slice_kernel.clone();
        let slice_op = move |b: &mut [f64], off: usize| {
            if inverse {
                slice.complex_inverse(b, off, scale)
            } else {
                slice.complex_forward(b, off)
            }
        };

        if self.plan.pow2() {
            self.run_batched(a, s, ss, r, rs, c, row_op)?;
            self.run_batched(a, r, rs, s, ss, c, slice_op)
        } else {
            self.run_gathered(a, s, ss, r, rs, c, row_op)?;
            self.run_gathered(a, r, rs, s, ss, c, slice_op)
        }
    }

    /// Full-spectrum real transform along the stored half of the column
    /// bins, then conjugate mirroring. Works for any axis lengths; the
    /// power-of-two entry points only take it when an axis rules the
    /// packed pipeline out.
    fn full_transform(
        &mut self,
        a: &mut [f64],
        inverse: bool,
        scale: bool,
    ) -> Result<(), TransformError> {
        let (s, r, c) = self.dims();
        let rs = 2 * c;
        let ss = r * rs;

        // Spread the tightly packed real rows so every row owns a
        // 2 * cols slot. Backwards, so no source is overwritten before
        // it is moved.
        for m in (1..s * r).rev() {
            a.copy_within(m * c..m * c + c, 2 * m * c);
        }

        let col = self.col_kernel.clone();
        self.run_direct(a, s * r, rs, move |b, off| {
            if inverse {
                col.real_inverse_full(b, off, scale)
            } else {
                col.real_forward_full(b, off)
            }
        })?;

        let half_cols = c / 2 + 1;

        let row = self.row_kernel.clone();
        self.run_gathered(a, s, ss, r, rs, half_cols, move |b, off| {
            if inverse {
                row.complex_inverse(b, off, scale)
            } else {
                row.complex_forward(b, off)
            }
        })?;

        let slice = self.slice_kernel.clone();
        self.run_gathered(a, r, rs, s, ss, half_cols, move |b, off| {
            if inverse {
                slice.complex_inverse(b, off, scale)
            } else {
                slice.complex_forward(b, off)
            }
        })?;

        symmetry::mirror_conjugate(a, s, r, c);
        Ok(())
    }

    /// Runs the plane rotation over all slice pairs; the interior pairs
    /// can run on separate workers, the self-paired slices cannot.
    fn untangle(&mut self, a: &mut [f64], forward: bool) -> Result<(), TransformError> {
        let (s, r, c) = self.dims();

        let interior = s / 2 - 1;
        if interior > 0 {
            let tasks = self.tasks_for(interior);
            let grid = SharedGrid::new(a);
            self.scheduler
                .run(tasks, &mut self.scratch, 0, move |t, _scratch| {
                    // SAFETY: pair i touches only slices i and s - i.
                    let buf = unsafe { grid.slice() };
                    for i in partition::contiguous(interior, tasks, t) {
                        symmetry::untangle_slice_pair(buf, s, r, c, i + 1, forward);
                    }
                })?;
        }

        symmetry::untangle_edge_slices(a, s, r, c, forward);
        Ok(())
    }
}

impl core::fmt::Debug for Fft3d {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fft3d")
            .field("slices", &self.plan.slices())
            .field("rows", &self.plan.rows())
            .field("cols", &self.plan.cols())
            .field("threads", &self.plan.threads())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::Fft3d;
    use crate::error::TransformError;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn lcg_data(len: usize) -> Vec<f64> {
        let mut state = 12345u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                (state >> 8) as f64 / (1 << 24) as f64 - 0.5
            })
            .collect()
    }

    /// Naive 3-D DFT on interleaved complex data.
    fn naive_complex_3d(input: &[f64], s: usize, r: usize, c: usize, inverse: bool) -> Vec<f64> {
        let sign = if inverse { 2.0 } else { -2.0 };
        let mut out = vec![0.0; 2 * s * r * c];
        for p in 0..s {
            for q in 0..r {
                for k in 0..c {
                    let mut re = 0.0;
                    let mut im = 0.0;
                    for a in 0..s {
                        for b in 0..r {
                            for d in 0..c {
                                let angle = sign
                                    * PI
                                    * ((p * a) as f64 / s as f64
                                        + (q * b) as f64 / r as f64
                                        + (k * d) as f64 / c as f64);
                                let (sn, cs) = angle.sin_cos();
                                let idx = 2 * ((a * r + b) * c + d);
                                re += input[idx] * cs - input[idx + 1] * sn;
                                im += input[idx] * sn + input[idx + 1] * cs;
                            }
                        }
                    }
                    let idx = 2 * ((p * r + q) * c + k);
                    out[idx] = re;
                    out[idx + 1] = im;
                }
            }
        }
        out
    }

    /// Real volume lifted to an interleaved complex buffer.
    fn lift(x: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; 2 * x.len()];
        for (j, &v) in x.iter().enumerate() {
            out[2 * j] = v;
        }
        out
    }

    #[test]
    fn test_complex_impulse_has_flat_spectrum() {
        let mut fft = Fft3d::new(4, 4, 4).unwrap();
        let mut data = vec![0.0; 2 * 64];
        data[0] = 1.0;

        fft.complex_forward(&mut data).unwrap();

        for k in 0..64 {
            assert!(approx_eq(data[2 * k], 1.0, 1e-12), "Bin {k} re: {}", data[2 * k]);
            assert!(approx_eq(data[2 * k + 1], 0.0, 1e-12), "Bin {k} im: {}", data[2 * k + 1]);
        }
    }

    #[test]
    fn test_complex_vs_naive_dft() {
        for &(s, r, c) in &[(4usize, 4usize, 2usize), (3, 4, 5), (2, 2, 7)] {
            let mut fft = Fft3d::new(s, r, c).unwrap();
            let input = lcg_data(2 * s * r * c);
            let expected = naive_complex_3d(&input, s, r, c, false);

            let mut data = input.clone();
            fft.complex_forward(&mut data).unwrap();

            for i in 0..data.len() {
                assert!(
                    approx_eq(data[i], expected[i], 1e-8),
                    "{s}x{r}x{c} slot {i}: got {}, expected {}",
                    data[i],
                    expected[i]
                );
            }
        }
    }

    #[test]
    fn test_complex_round_trip() {
        for &(s, r, c) in &[(8usize, 4usize, 4usize), (3, 5, 2), (6, 5, 3)] {
            let mut fft = Fft3d::new(s, r, c).unwrap();
            let input = lcg_data(2 * s * r * c);

            let mut data = input.clone();
            fft.complex_forward(&mut data).unwrap();
            fft.complex_inverse(&mut data, true).unwrap();

            for i in 0..data.len() {
                assert!(
                    approx_eq(data[i], input[i], 1e-10),
                    "{s}x{r}x{c} slot {i}: got {}, expected {}",
                    data[i],
                    input[i]
                );
            }
        }
    }

    #[test]
    fn test_unscaled_complex_inverse_carries_grid_size() {
        let (s, r, c) = (4, 2, 4);
        let n = (s * r * c) as f64;
        let mut fft = Fft3d::new(s, r, c).unwrap();
        let input = lcg_data(2 * s * r * c);

        let mut data = input.clone();
        fft.complex_forward(&mut data).unwrap();
        fft.complex_inverse(&mut data, false).unwrap();

        for i in 0..data.len() {
            assert!(approx_eq(data[i], input[i] * n, 1e-8));
        }
    }

    #[test]
    fn test_real_packed_round_trip() {
        for &(s, r, c) in &[(8usize, 4usize, 4usize), (4, 4, 2), (2, 2, 2), (4, 8, 16)] {
            let mut fft = Fft3d::new(s, r, c).unwrap();
            let input = lcg_data(s * r * c);

            let mut data = input.clone();
            fft.real_forward(&mut data).unwrap();
            fft.real_inverse(&mut data, true).unwrap();

            for i in 0..data.len() {
                assert!(
                    approx_eq(data[i], input[i], 1e-10),
                    "{s}x{r}x{c} slot {i}: got {}, expected {}",
                    data[i],
                    input[i]
                );
            }
        }
    }

    #[test]
    fn test_real_forward_full_matches_lifted_complex() {
        for &(s, r, c) in &[(4usize, 4usize, 4usize), (8, 4, 2), (2, 4, 8), (6, 5, 3), (3, 4, 4)] {
            let mut fft = Fft3d::new(s, r, c).unwrap();
            let x = lcg_data(s * r * c);

            let mut expected = lift(&x);
            fft.complex_forward(&mut expected).unwrap();

            let mut data = vec![0.0; 2 * s * r * c];
            data[..x.len()].copy_from_slice(&x);
            fft.real_forward_full(&mut data).unwrap();

            for i in 0..data.len() {
                assert!(
                    approx_eq(data[i], expected[i], 1e-9),
                    "{s}x{r}x{c} slot {i}: got {}, expected {}",
                    data[i],
                    expected[i]
                );
            }
        }
    }

    #[test]
    fn test_real_inverse_full_matches_lifted_complex() {
        for &(s, r, c) in &[(4usize, 4usize, 4usize), (8, 2, 4), (2, 3, 4), (5, 4, 6)] {
            for &scale in &[true, false] {
                let mut fft = Fft3d::new(s, r, c).unwrap();
                let x = lcg_data(s * r * c);

                let mut expected = lift(&x);
                fft.complex_inverse(&mut expected, scale).unwrap();

                let mut data = vec![0.0; 2 * s * r * c];
                data[..x.len()].copy_from_slice(&x);
                fft.real_inverse_full(&mut data, scale).unwrap();

                let eps = if scale { 1e-10 } else { 1e-8 };
                for i in 0..data.len() {
                    assert!(
                        approx_eq(data[i], expected[i], eps),
                        "{s}x{r}x{c} scale {scale} slot {i}: got {}, expected {}",
                        data[i],
                        expected[i]
                    );
                }
            }
        }
    }

    #[test]
    fn test_packed_and_fallback_paths_agree() {
        // On a power-of-two grid the fallback pipeline must produce the
        // same full spectrum as the packed one.
        let (s, r, c) = (4, 8, 4);
        let x = lcg_data(s * r * c);

        let mut fft = Fft3d::new(s, r, c).unwrap();
        let mut packed = vec![0.0; 2 * s * r * c];
        packed[..x.len()].copy_from_slice(&x);
        fft.real_forward_full(&mut packed).unwrap();

        let mut fallback = vec![0.0; 2 * s * r * c];
        fallback[..x.len()].copy_from_slice(&x);
        fft.full_transform(&mut fallback, false, false).unwrap();

        for i in 0..packed.len() {
            assert!(
                approx_eq(packed[i], fallback[i], 1e-9),
                "Slot {i}: packed {}, fallback {}",
                packed[i],
                fallback[i]
            );
        }
    }

    #[test]
    fn test_cosine_volume_concentrates_in_two_bins() {
        let n = 8;
        let mut fft = Fft3d::new(n, n, n).unwrap();
        let k = 2;

        let mut data = vec![0.0; 2 * n * n * n];
        for s in 0..n {
            let v = (2.0 * PI * (k * s) as f64 / n as f64).cos();
            for r in 0..n {
                for c in 0..n {
                    data[(s * n + r) * n + c] = v;
                }
            }
        }

        fft.real_forward_full(&mut data).unwrap();

        let expected = (n * n * n) as f64 / 2.0;
        for s in 0..n {
            for r in 0..n {
                for c in 0..n {
                    let idx = 2 * ((s * n + r) * n + c);
                    let hot = (s == k || s == n - k) && r == 0 && c == 0;
                    let want = if hot { expected } else { 0.0 };
                    assert!(
                        approx_eq(data[idx], want, 1e-7),
                        "Bin ({s},{r},{c}) re: {}",
                        data[idx]
                    );
                    assert!(approx_eq(data[idx + 1], 0.0, 1e-7), "Bin ({s},{r},{c}) im");
                }
            }
        }
    }

    #[test]
    fn test_fast_path_spectrum_is_bit_exact_hermitian() {
        let (s, r, c) = (8usize, 4usize, 4usize);
        let mut fft = Fft3d::new(s, r, c).unwrap();
        let x = lcg_data(s * r * c);

        let mut data = vec![0.0; 2 * s * r * c];
        data[..x.len()].copy_from_slice(&x);
        fft.real_forward_full(&mut data).unwrap();

        for p in 0..s {
            let mp = if p == 0 { 0 } else { s - p };
            for q in 0..r {
                let mq = if q == 0 { 0 } else { r - q };
                for k in 0..c {
                    let mk = if k == 0 { 0 } else { c - k };
                    let idx = 2 * ((p * r + q) * c + k);
                    let mirror = 2 * ((mp * r + mq) * c + mk);
                    assert_eq!(data[idx], data[mirror], "Bin ({p},{q},{k}) re");
                    assert_eq!(data[idx + 1], -data[mirror + 1], "Bin ({p},{q},{k}) im");
                }
            }
        }

        for &p in &[0, s / 2] {
            for &q in &[0, r / 2] {
                for &k in &[0, c / 2] {
                    let idx = 2 * ((p * r + q) * c + k);
                    assert_eq!(data[idx + 1], 0.0, "Corner ({p},{q},{k}) im");
                }
            }
        }
    }

    #[test]
    fn test_results_do_not_depend_on_thread_count() {
        let (s, r, c) = (64, 32, 32);
        let input = lcg_data(s * r * c);

        let mut fft = Fft3d::new(s, r, c).unwrap();
        let mut sequential = input.clone();
        fft.real_forward(&mut sequential).unwrap();

        for &threads in &[2usize, 8] {
            fft.reconfigure(threads).unwrap();
            let mut parallel = input.clone();
            fft.real_forward(&mut parallel).unwrap();
            assert_eq!(sequential, parallel, "threads {threads}");
        }
    }

    #[test]
    fn test_parallel_complex_round_trip() {
        let (s, r, c) = (64, 32, 32);
        let mut fft = Fft3d::new(s, r, c).unwrap();
        fft.reconfigure(4).unwrap();

        let input = lcg_data(2 * s * r * c);
        let mut data = input.clone();
        fft.complex_forward(&mut data).unwrap();
        fft.complex_inverse(&mut data, true).unwrap();

        for i in 0..data.len() {
            assert!(approx_eq(data[i], input[i], 1e-10));
        }
    }

    #[test]
    fn test_degenerate_axes_are_rejected() {
        assert_eq!(
            Fft3d::new(1, 4, 4).unwrap_err(),
            TransformError::InvalidDimension {
                axis: "slices",
                len: 1
            }
        );
        assert_eq!(
            Fft3d::new(4, 4, 0).unwrap_err(),
            TransformError::InvalidDimension { axis: "cols", len: 0 }
        );
    }

    #[test]
    fn test_packed_transforms_require_power_of_two() {
        let mut fft = Fft3d::new(4, 6, 4).unwrap();
        let mut data = vec![0.0; 4 * 6 * 4];

        assert_eq!(
            fft.real_forward(&mut data).unwrap_err(),
            TransformError::UnsupportedAxisLength { len: 6 }
        );
        assert_eq!(
            fft.real_inverse(&mut data, true).unwrap_err(),
            TransformError::UnsupportedAxisLength { len: 6 }
        );
    }

    #[test]
    fn test_short_buffers_are_rejected() {
        let mut fft = Fft3d::new(4, 4, 4).unwrap();

        let mut short = vec![0.0; 100];
        assert_eq!(
            fft.complex_forward(&mut short).unwrap_err(),
            TransformError::BufferSize {
                required: 128,
                actual: 100
            }
        );

        let mut packed = vec![0.0; 63];
        assert_eq!(
            fft.real_forward(&mut packed).unwrap_err(),
            TransformError::BufferSize {
                required: 64,
                actual: 63
            }
        );
    }

    #[test]
    fn test_reconfigure_clamps_and_reports() {
        let mut fft = Fft3d::new(4, 4, 4).unwrap();
        assert_eq!(fft.threads(), 1);
        assert_eq!((fft.slices(), fft.rows(), fft.cols()), (4, 4, 4));

        fft.reconfigure(0).unwrap();
        assert_eq!(fft.threads(), 1);

        // A request that clamps to the current count changes nothing and
        // leaves the instance fully usable.
        fft.reconfigure(1).unwrap();
        assert_eq!(fft.threads(), 1);
        let mut data = vec![0.0; 2 * 64];
        data[0] = 1.0;
        fft.complex_forward(&mut data).unwrap();
        assert_eq!(data[2], 1.0);

        fft.reconfigure(2).unwrap();
        assert!(fft.threads() >= 1);
    }

    #[test]
    fn test_debug_reports_configuration() {
        let fft = Fft3d::new(8, 4, 2).unwrap();
        let text = format!("{fft:?}");
        assert!(text.contains("slices: 8"), "{text}");
        assert!(text.contains("rows: 4"), "{text}");
        assert!(text.contains("cols: 2"), "{text}");
        assert!(text.contains("threads: 1"), "{text}");
    }
}
