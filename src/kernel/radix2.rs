use std::f64::consts::PI;

use super::Complex64;

/// Reverses the bits of an integer value.
#[inline]
fn reverse_bits(mut x: usize, bits: usize) -> usize {
    let mut result = 0;
    for _ in 0..bits {
        result = (result << 1) | (x & 1);
        x >>= 1;
    }
    result
}

/// Performs bit-reversal permutation on interleaved complex values.
fn bit_reverse_pairs(buf: &mut [f64], offset: usize, n: usize, log2n: usize) {
    for i in 0..n {
        let j = reverse_bits(i, log2n);
        if i < j {
            buf.swap(offset + 2 * i, offset + 2 * j);
            buf.swap(offset + 2 * i + 1, offset + 2 * j + 1);
        }
    }
}

fn conjugate(buf: &mut [f64], offset: usize, n: usize) {
    for k in 0..n {
        buf[offset + 2 * k + 1] = -buf[offset + 2 * k + 1];
    }
}

/// Precomputed twiddle tables for one power-of-two transform length.
///
/// Operates in place on `len` interleaved complex values starting at an
/// offset into a larger buffer.
pub(crate) struct FftTables {
    len: usize,
    twiddles: Vec<Complex64>,
}

impl FftTables {
    pub(crate) fn new(len: usize) -> Self {
        assert!(len.is_power_of_two() && len > 0);

        let log2n = len.trailing_zeros() as usize;
        let mut twiddles = Vec::with_capacity(len.saturating_sub(1));

        for stage in 0..log2n {
            let num_twiddles = 1usize << stage;
            let span = 1usize << (stage + 1);

            for k in 0..num_twiddles {
                let angle = -2.0 * PI * k as f64 / span as f64;
                twiddles.push(Complex64::new(angle.cos(), angle.sin()));
            }
        }

        Self { len, twiddles }
    }

    /// In-place Cooley-Tukey DIT forward transform.
    pub(crate) fn forward(&self, buf: &mut [f64], offset: usize) {
        let n = self.len;
        if n == 1 {
            return;
        }

        let log2n = n.trailing_zeros() as usize;
        bit_reverse_pairs(buf, offset, n, log2n);

        let mut twiddle_offset = 0;

        for stage in 0..log2n {
            let span = 1usize << (stage + 1);
            let half = span >> 1;
            let stage_twiddles = &self.twiddles[twiddle_offset..twiddle_offset + half];

            let mut group = 0;
            while group < n {
                for k in 0..half {
                    let w = stage_twiddles[k];
                    let i0 = offset + 2 * (group + k);
                    let i1 = i0 + 2 * half;

                    let tr = buf[i1] * w.re - buf[i1 + 1] * w.im;
                    let ti = buf[i1] * w.im + buf[i1 + 1] * w.re;
                    buf[i1] = buf[i0] - tr;
                    buf[i1 + 1] = buf[i0 + 1] - ti;
                    buf[i0] += tr;
                    buf[i0 + 1] += ti;
                }
                group += span;
            }

            twiddle_offset += half;
        }
    }

    /// Unscaled inverse transform via conjugation of the forward transform.
    pub(crate) fn inverse(&self, buf: &mut [f64], offset: usize) {
        conjugate(buf, offset, self.len);
        self.forward(buf, offset);
        conjugate(buf, offset, self.len);
    }
}

/// Full plan for one power-of-two axis length: the complex transform, the
/// half-size transform backing the real transforms, and the rotation
/// twiddles that recombine the half-size spectrum.
pub(crate) struct Radix2Plan {
    full: FftTables,
    half: FftTables,
    rot: Vec<Complex64>,
}

impl Radix2Plan {
    pub(crate) fn new(len: usize) -> Self {
        assert!(len.is_power_of_two() && len > 1);

        let h = len / 2;
        let rot = (0..=h / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / len as f64;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();

        Self {
            full: FftTables::new(len),
            half: FftTables::new(h),
            rot,
        }
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.full.len
    }

    /// Rotation twiddle `exp(-2 pi i k / len)` for the real transforms.
    #[inline(always)]
    pub(crate) fn rot(&self, k: usize) -> Complex64 {
        self.rot[k]
    }

    pub(crate) fn forward(&self, buf: &mut [f64], offset: usize) {
        self.full.forward(buf, offset);
    }

    pub(crate) fn inverse(&self, buf: &mut [f64], offset: usize, scale: bool) {
        self.full.inverse(buf, offset);
        if scale {
            let inv = 1.0 / self.len() as f64;
            for v in &mut buf[offset..offset + 2 * self.len()] {
                *v *= inv;
            }
        }
    }

    /// Forward transform of the half-size plan, viewing `len` reals as
    /// `len / 2` interleaved complex values.
    pub(crate) fn half_forward(&self, buf: &mut [f64], offset: usize) {
        self.half.forward(buf, offset);
    }

    /// Unscaled inverse of [`Self::half_forward`].
    pub(crate) fn half_inverse(&self, buf: &mut [f64], offset: usize) {
        self.half.inverse(buf, offset);
    }
}
