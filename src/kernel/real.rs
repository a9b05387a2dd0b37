//! Real transforms built on the half-size complex transform.
//!
//! A line of `n` reals is viewed as `n / 2` interleaved complex values,
//! transformed with the half-size plan and recombined with one rotation
//! pass. The packed result stores `Re X[0]` and `Re X[n/2]` in the first
//! two slots and `Re/Im X[k]` pairs for `0 < k < n/2` after them.

use super::radix2::Radix2Plan;

/// In-place packed forward transform of `n` reals at `offset`.
pub(crate) fn real_forward(plan: &Radix2Plan, buf: &mut [f64], offset: usize) {
    let n = plan.len();
    if n == 2 {
        let a = buf[offset];
        let b = buf[offset + 1];
        buf[offset] = a + b;
        buf[offset + 1] = a - b;
        return;
    }

    let h = n / 2;
    plan.half_forward(buf, offset);

    // Endpoint bins X[0] and X[n/2] are both real.
    let zr = buf[offset];
    let zi = buf[offset + 1];
    buf[offset] = zr + zi;
    buf[offset + 1] = zr - zi;

    for k in 1..=h / 2 {
        let i = offset + 2 * k;
        let j = offset + 2 * (h - k);

        if k == h - k {
            buf[i + 1] = -buf[i + 1];
        } else {
            let ar = buf[i];
            let ai = buf[i + 1];
            let br = buf[j];
            let bi = buf[j + 1];

            let er = 0.5 * (ar + br);
            let ei = 0.5 * (ai - bi);
            let or0 = 0.5 * (ai + bi);
            let oi0 = 0.5 * (br - ar);

            let w = plan.rot(k);
            let tr = w.re * or0 - w.im * oi0;
            let ti = w.re * oi0 + w.im * or0;

            buf[i] = er + tr;
            buf[i + 1] = ei + ti;
            buf[j] = er - tr;
            buf[j + 1] = ti - ei;
        }
    }
}

/// In-place inverse of [`real_forward`].
///
/// With `scale` the line is divided so that the round trip is exact;
/// without it the result carries the conventional factor `n / 2`.
pub(crate) fn real_inverse(plan: &Radix2Plan, buf: &mut [f64], offset: usize, scale: bool) {
    let n = plan.len();
    if n == 2 {
        let x0 = buf[offset];
        let xn = buf[offset + 1];
        buf[offset] = 0.5 * (x0 + xn);
        buf[offset + 1] = 0.5 * (x0 - xn);
        return;
    }

    let h = n / 2;

    let x0 = buf[offset];
    let xn = buf[offset + 1];
    buf[offset] = 0.5 * (x0 + xn);
    buf[offset + 1] = 0.5 * (x0 - xn);

    for k in 1..=h / 2 {
        let i = offset + 2 * k;
        let j = offset + 2 * (h - k);

        if k == h - k {
            buf[i + 1] = -buf[i + 1];
        } else {
            let ar = buf[i];
            let ai = buf[i + 1];
            let br = buf[j];
            let bi = buf[j + 1];

            let er = 0.5 * (ar + br);
            let ei = 0.5 * (ai - bi);
            let dr = 0.5 * (ar - br);
            let di = 0.5 * (ai + bi);

            let w = plan.rot(k);
            let tr = w.re * dr + w.im * di;
            let ti = w.re * di - w.im * dr;

            buf[i] = er - ti;
            buf[i + 1] = ei + tr;
            buf[j] = er + ti;
            buf[j + 1] = tr - ei;
        }
    }

    plan.half_inverse(buf, offset);

    if scale {
        let inv = 1.0 / h as f64;
        for v in &mut buf[offset..offset + n] {
            *v *= inv;
        }
    }
}

/// In-place packed spectrum of the *inverse* transform of `n` reals.
///
/// Since the input is real, the inverse spectrum is the conjugate of the
/// forward one. With `scale` the line is divided by `n`.
pub(crate) fn real_inverse2(plan: &Radix2Plan, buf: &mut [f64], offset: usize, scale: bool) {
    let n = plan.len();
    real_forward(plan, buf, offset);

    for k in 1..n / 2 {
        buf[offset + 2 * k + 1] = -buf[offset + 2 * k + 1];
    }

    if scale {
        let inv = 1.0 / n as f64;
        for v in &mut buf[offset..offset + n] {
            *v *= inv;
        }
    }
}
