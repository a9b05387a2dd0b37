//! Axis pass executors.
//!
//! Every 3-D transform is three sweeps of 1-D transforms. Lines along
//! the column axis are contiguous and get the kernel applied directly.
//! Lines along the row and slice axes are strided; they are gathered
//! into dense scratch, transformed, and scattered back. The fast path
//! batches several columns per gather so their loads share cache lines;
//! the fallback path gathers one column at a time into a local buffer.

use crate::plan::MAX_COLUMN_GROUP;

/// Applies `op` to one contiguous line per outer index.
pub(crate) fn direct_pass<I, F>(buf: &mut [f64], outers: I, stride: usize, op: F)
where
    I: IntoIterator<Item = usize>,
    F: Fn(&mut [f64], usize),
{
    for outer in outers {
        op(buf, outer * stride);
    }
}

/// Strided pass over batches of complex columns.
///
/// For each outer index, groups of up to [`MAX_COLUMN_GROUP`] complex
/// columns are gathered into `scratch` as dense lines of `line_len`
/// complex values, transformed with `op`, and scattered back. The group
/// width shrinks at the right edge; the loop itself is the same for
/// every width.
#[allow(clippy::too_many_arguments)]
pub(crate) fn batched_pass<I, F>(
    buf: &mut [f64],
    outers: I,
    outer_stride: usize,
    line_len: usize,
    line_stride: usize,
    ncols: usize,
    scratch: &mut [f64],
    op: F,
) where
    I: IntoIterator<Item = usize>,
    F: Fn(&mut [f64], usize),
{
    for outer in outers {
        let base = outer * outer_stride;
        let mut c0 = 0;
        while c0 < ncols {
            let group = MAX_COLUMN_GROUP.min(ncols - c0);

            for j in 0..line_len {
                let src = base + j * line_stride + 2 * c0;
                let dst = 2 * j;
                for t in 0..group {
                    scratch[2 * t * line_len + dst] = buf[src + 2 * t];
                    scratch[2 * t * line_len + dst + 1] = buf[src + 2 * t + 1];
                }
            }

            for t in 0..group {
                op(scratch, 2 * t * line_len);
            }

            for j in 0..line_len {
                let dst = base + j * line_stride + 2 * c0;
                let src = 2 * j;
                for t in 0..group {
                    buf[dst + 2 * t] = scratch[2 * t * line_len + src];
                    buf[dst + 2 * t + 1] = scratch[2 * t * line_len + src + 1];
                }
            }

            c0 += group;
        }
    }
}

/// Strided pass gathering one complex column at a time.
///
/// Used on the mixed-radix path, where no shared scratch arena exists;
/// the line buffer lives on the task.
pub(crate) fn gathered_pass<I, F>(
    buf: &mut [f64],
    outers: I,
    outer_stride: usize,
    line_len: usize,
    line_stride: usize,
    ncols: usize,
    op: F,
) where
    I: IntoIterator<Item = usize>,
    F: Fn(&mut [f64], usize),
{
    let mut line = vec![0.0; 2 * line_len];
    for outer in outers {
        let base = outer * outer_stride;
        for c in 0..ncols {
            for j in 0..line_len {
                let src = base + j * line_stride + 2 * c;
                line[2 * j] = buf[src];
                line[2 * j + 1] = buf[src + 1];
            }

            op(&mut line, 0);

            for j in 0..line_len {
                let dst = base + j * line_stride + 2 * c;
                buf[dst] = line[2 * j];
                buf[dst + 1] = line[2 * j + 1];
            }
        }
    }
}
