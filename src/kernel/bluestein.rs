use std::f64::consts::PI;

use super::radix2::FftTables;
use super::Complex64;

/// Chirp-z transform plan for a non-power-of-two length.
///
/// The transform is expressed as a circular convolution of the chirped
/// input with a fixed chirp filter, carried out over a power-of-two
/// convolver of at least `2 * len`. The chirp and the spectrum of the
/// filter are computed once at construction.
pub(crate) struct BluesteinPlan {
    len: usize,
    conv_len: usize,
    chirp: Vec<Complex64>,
    filter: Vec<Complex64>,
    conv: FftTables,
}

impl BluesteinPlan {
    pub(crate) fn new(len: usize) -> Self {
        assert!(len > 1);

        let conv_len = (2 * len).next_power_of_two();

        // The quadratic phase is reduced modulo 2 * len before the angle is
        // formed, which keeps the argument small for long lines.
        let chirp: Vec<Complex64> = (0..len)
            .map(|j| {
                let q = (j * j) % (2 * len);
                let angle = -PI * q as f64 / len as f64;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();

        let conv = FftTables::new(conv_len);

        let mut filter_buf = vec![0.0; 2 * conv_len];
        for (j, c) in chirp.iter().enumerate() {
            let b = c.conj();
            filter_buf[2 * j] = b.re;
            filter_buf[2 * j + 1] = b.im;
            if j > 0 {
                filter_buf[2 * (conv_len - j)] = b.re;
                filter_buf[2 * (conv_len - j) + 1] = b.im;
            }
        }
        conv.forward(&mut filter_buf, 0);

        let filter = (0..conv_len)
            .map(|k| Complex64::new(filter_buf[2 * k], filter_buf[2 * k + 1]))
            .collect();

        Self {
            len,
            conv_len,
            chirp,
            filter,
            conv,
        }
    }

    /// In-place forward transform of `len` interleaved complex values.
    pub(crate) fn forward(&self, buf: &mut [f64], offset: usize) {
        let m = self.conv_len;

        let mut work = vec![0.0; 2 * m];
        for (j, c) in self.chirp.iter().enumerate() {
            let x = Complex64::new(buf[offset + 2 * j], buf[offset + 2 * j + 1]);
            let y = x.mul(c);
            work[2 * j] = y.re;
            work[2 * j + 1] = y.im;
        }

        self.conv.forward(&mut work, 0);
        for (k, b) in self.filter.iter().enumerate() {
            let y = Complex64::new(work[2 * k], work[2 * k + 1]).mul(b);
            work[2 * k] = y.re;
            work[2 * k + 1] = y.im;
        }
        self.conv.inverse(&mut work, 0);

        let inv_m = 1.0 / m as f64;
        for (k, c) in self.chirp.iter().enumerate() {
            let y = Complex64::new(work[2 * k] * inv_m, work[2 * k + 1] * inv_m);
            let x = y.mul(c);
            buf[offset + 2 * k] = x.re;
            buf[offset + 2 * k + 1] = x.im;
        }
    }

    /// In-place inverse transform via conjugation of the forward transform.
    pub(crate) fn inverse(&self, buf: &mut [f64], offset: usize, scale: bool) {
        let n = self.len;
        for k in 0..n {
            buf[offset + 2 * k + 1] = -buf[offset + 2 * k + 1];
        }
        self.forward(buf, offset);
        for k in 0..n {
            buf[offset + 2 * k + 1] = -buf[offset + 2 * k + 1];
        }

        if scale {
            let inv = 1.0 / n as f64;
            for v in &mut buf[offset..offset + 2 * n] {
                *v *= inv;
            }
        }
    }
}
