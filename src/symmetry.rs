//! Packed-spectrum bookkeeping for the real transforms.
//!
//! After the three fast-path passes the first two cells of every row
//! still hold an entangled combination of the column-bin-0 and
//! column-bin-C/2 planes. The rotation below untangles them into the
//! packed format, pairing cell `(s, r)` with `((S - s) % S, R - r)`.
//! `fill_symmetric` expands a packed spectrum in place into the full
//! `2 * cols`-wide interleaved form.

#[inline(always)]
fn rotate_forward(buf: &mut [f64], a0: usize, b0: usize) {
    buf[b0] = 0.5 * (buf[a0] - buf[b0]);
    buf[a0] -= buf[b0];
    buf[b0 + 1] = 0.5 * (buf[a0 + 1] + buf[b0 + 1]);
    buf[a0 + 1] -= buf[b0 + 1];
}

#[inline(always)]
fn rotate_inverse(buf: &mut [f64], a0: usize, b0: usize) {
    let xr = buf[a0] - buf[b0];
    buf[a0] += buf[b0];
    buf[b0] = xr;
    let xi = buf[b0 + 1] - buf[a0 + 1];
    buf[a0 + 1] += buf[b0 + 1];
    buf[b0 + 1] = xi;
}

#[inline(always)]
fn rotate(buf: &mut [f64], a0: usize, b0: usize, forward: bool) {
    if forward {
        rotate_forward(buf, a0, b0);
    } else {
        rotate_inverse(buf, a0, b0);
    }
}

/// Untangles the plane cells of the slice pair `(i, slices - i)`.
///
/// `i` must lie in `1..slices / 2`. Distinct `i` touch disjoint slices,
/// so pairs can run on different workers.
pub(crate) fn untangle_slice_pair(
    buf: &mut [f64],
    slices: usize,
    rows: usize,
    cols: usize,
    i: usize,
    forward: bool,
) {
    debug_assert!(i >= 1 && i < slices / 2);

    let rs = cols;
    let ss = rows * cols;
    let j = slices - i;

    for k in 1..rows / 2 {
        let l = rows - k;
        rotate(buf, i * ss + k * rs, j * ss + l * rs, forward);
        rotate(buf, j * ss + k * rs, i * ss + l * rs, forward);
    }

    rotate(buf, i * ss, j * ss, forward);
    rotate(buf, i * ss + (rows / 2) * rs, j * ss + (rows / 2) * rs, forward);
}

/// Untangles the plane cells of the self-paired slices `0` and
/// `slices / 2`, where the pairing runs along the row axis alone.
pub(crate) fn untangle_edge_slices(
    buf: &mut [f64],
    slices: usize,
    rows: usize,
    cols: usize,
    forward: bool,
) {
    let rs = cols;
    let ss = rows * cols;

    for &i in &[0, slices / 2] {
        for k in 1..rows / 2 {
            let l = rows - k;
            rotate(buf, i * ss + k * rs, i * ss + l * rs, forward);
        }
    }
}

/// Expands a packed spectrum in place to the full interleaved form.
///
/// The packed data occupies the first `slices * rows * cols` values; on
/// return every row holds `cols` interleaved complex bins. Mirrored
/// bins are copied bit for bit and the eight self-conjugate bins get an
/// imaginary part of exactly zero.
pub(crate) fn fill_symmetric(buf: &mut [f64], slices: usize, rows: usize, cols: usize) {
    let rs = 2 * cols;
    let ss = rows * rs;
    let ch = cols / 2;

    // Spread the packed rows so every row owns a 2 * cols slot. Walking
    // backwards keeps every source intact until it is moved.
    for m in (1..slices * rows).rev() {
        let src = m * cols;
        buf.copy_within(src..src + cols, 2 * src);
    }

    // The interior column bins are already in their final cells; write
    // their conjugates into the upper half of the mirror rows.
    for s in 0..slices {
        let ms = if s == 0 { 0 } else { slices - s };
        for r in 0..rows {
            let mr = if r == 0 { 0 } else { rows - r };
            let src_base = s * ss + r * rs;
            let dst_base = ms * ss + mr * rs;
            for k in 1..ch {
                buf[dst_base + 2 * (cols - k)] = buf[src_base + 2 * k];
                buf[dst_base + 2 * (cols - k) + 1] = -buf[src_base + 2 * k + 1];
            }
        }
    }

    // Unpack the column-bin-0 and column-bin-cols/2 planes.
    for r in 1..rows / 2 {
        for s in 0..slices {
            let ms = if s == 0 { 0 } else { slices - s };
            unpack_pair(buf, s * ss + r * rs, ms * ss + (rows - r) * rs, cols);
        }
    }
    for &r in &[0, rows / 2] {
        for s in 1..slices / 2 {
            unpack_pair(buf, s * ss + r * rs, (slices - s) * ss + r * rs, cols);
        }
    }
    for &s in &[0, slices / 2] {
        for &r in &[0, rows / 2] {
            let base = s * ss + r * rs;
            let q = buf[base + 1];
            buf[base + 1] = 0.0;
            buf[base + cols] = q;
            buf[base + cols + 1] = 0.0;
        }
    }
}

/// Writes the four plane bins of one packed orbit.
///
/// Cell pair `a` holds the bin-0 value `(p, q)`, cell pair `b` holds
/// the bin-cols/2 value as `(-im, re)`.
fn unpack_pair(buf: &mut [f64], a: usize, b: usize, cols: usize) {
    let p = buf[a];
    let q = buf[a + 1];
    let u = buf[b];
    let v = buf[b + 1];

    buf[b] = p;
    buf[b + 1] = -q;
    buf[a + cols] = v;
    buf[a + cols + 1] = -u;
    buf[b + cols] = v;
    buf[b + cols + 1] = u;
}

/// Completes a half-computed full spectrum by conjugate mirroring.
///
/// The transform passes only cover column bins `0..=cols / 2`; every
/// remaining bin is the conjugate of its mirror. Self-conjugate bins of
/// a real-input spectrum carry no imaginary part, so theirs is forced
/// to zero.
pub(crate) fn mirror_conjugate(buf: &mut [f64], slices: usize, rows: usize, cols: usize) {
    let rs = 2 * cols;
    let ss = rows * rs;

    for s in 0..slices {
        let ms = if s == 0 { 0 } else { slices - s };
        for r in 0..rows {
            let mr = if r == 0 { 0 } else { rows - r };
            let src_base = ms * ss + mr * rs;
            let dst_base = s * ss + r * rs;
            for k in cols / 2 + 1..cols {
                buf[dst_base + 2 * k] = buf[src_base + 2 * (cols - k)];
                buf[dst_base + 2 * k + 1] = -buf[src_base + 2 * (cols - k) + 1];
            }
        }
    }

    for s in self_conjugate(slices) {
        for r in self_conjugate(rows) {
            for k in self_conjugate(cols) {
                buf[s * ss + r * rs + 2 * k + 1] = 0.0;
            }
        }
    }
}

fn self_conjugate(len: usize) -> impl Iterator<Item = usize> {
    let half = if len % 2 == 0 { Some(len / 2) } else { None };
    std::iter::once(0).chain(half)
}
