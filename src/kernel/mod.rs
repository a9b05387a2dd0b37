mod bluestein;
mod radix2;
mod real;

use bluestein::BluesteinPlan;
use radix2::Radix2Plan;

/// Simple complex number struct
#[derive(Clone, Copy, Debug, Default)]
#[repr(C)]
pub(crate) struct Complex64 {
    pub(crate) re: f64,
    pub(crate) im: f64,
}

impl Complex64 {
    #[inline(always)]
    pub(crate) const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub(crate) const fn conj(&self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    #[inline(always)]
    pub(crate) const fn mul(&self, o: &Self) -> Self {
        Self {
            re: self.re * o.re - self.im * o.im,
            im: self.re * o.im + self.im * o.re,
        }
    }
}

enum Backend {
    Radix2(Radix2Plan),
    Bluestein(BluesteinPlan),
}

/// One-dimensional transform kernel for a single axis length.
///
/// All operations work in place on a sub-range of a larger buffer; the
/// complex operations span `2 * len` values starting at `offset`, the
/// real operations span `len`. Power-of-two lengths run the radix-2
/// plan, everything else goes through the chirp transform. The packed
/// real operations exist only for power-of-two lengths.
pub(crate) struct LineKernel {
    len: usize,
    backend: Backend,
}

impl LineKernel {
    pub(crate) fn new(len: usize) -> Self {
        assert!(len > 1, "Axis length must be at least 2");

        let backend = if len.is_power_of_two() {
            Backend::Radix2(Radix2Plan::new(len))
        } else {
            Backend::Bluestein(BluesteinPlan::new(len))
        };

        Self { len, backend }
    }

    fn radix2(&self) -> &Radix2Plan {
        match &self.backend {
            Backend::Radix2(plan) => plan,
            Backend::Bluestein(_) => {
                unreachable!("Packed real transforms require a power-of-two length")
            }
        }
    }

    pub(crate) fn complex_forward(&self, buf: &mut [f64], offset: usize) {
        match &self.backend {
            Backend::Radix2(plan) => plan.forward(buf, offset),
            Backend::Bluestein(plan) => plan.forward(buf, offset),
        }
    }

    pub(crate) fn complex_inverse(&self, buf: &mut [f64], offset: usize, scale: bool) {
        match &self.backend {
            Backend::Radix2(plan) => plan.inverse(buf, offset, scale),
            Backend::Bluestein(plan) => plan.inverse(buf, offset, scale),
        }
    }

    pub(crate) fn real_forward(&self, buf: &mut [f64], offset: usize) {
        real::real_forward(self.radix2(), buf, offset);
    }

    pub(crate) fn real_inverse(&self, buf: &mut [f64], offset: usize, scale: bool) {
        real::real_inverse(self.radix2(), buf, offset, scale);
    }

    pub(crate) fn real_inverse2(&self, buf: &mut [f64], offset: usize, scale: bool) {
        real::real_inverse2(self.radix2(), buf, offset, scale);
    }

    /// Full-spectrum forward transform of `len` reals, widening the line
    /// in place to `2 * len` interleaved values.
    pub(crate) fn real_forward_full(&self, buf: &mut [f64], offset: usize) {
        let n = self.len;
        let mut line = vec![0.0; 2 * n];
        for j in 0..n {
            line[2 * j] = buf[offset + j];
        }
        self.complex_forward(&mut line, 0);
        buf[offset..offset + 2 * n].copy_from_slice(&line);
    }

    /// Full-spectrum inverse transform of `len` reals, widening the line
    /// in place to `2 * len` interleaved values.
    pub(crate) fn real_inverse_full(&self, buf: &mut [f64], offset: usize, scale: bool) {
        let n = self.len;
        let mut line = vec![0.0; 2 * n];
        for j in 0..n {
            line[2 * j] = buf[offset + j];
        }
        self.complex_inverse(&mut line, 0, scale);
        buf[offset..offset + 2 * n].copy_from_slice(&line);
    }
}
