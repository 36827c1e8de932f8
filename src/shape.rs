// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pure functions over `(ndims, shape, strides, offset)`. None of these
//! allocate beyond the `Vec` they return, and none read or write through a
//! data pointer — they reason about the shape/stride/offset algebra only.

use crate::error::CoreError;
use crate::order::Order;

/// Product of `shape`'s dimensions.
///
/// Per the rank-0 convention this crate uses (see `SPEC_FULL.md`'s "Open
/// Question resolutions"), a rank-0 shape (`shape.is_empty()`) has `numel`
/// `1`, matching the observable behavior of a rank-0 descriptor holding
/// exactly one element.
#[inline]
pub fn numel(shape: &[usize]) -> usize {
    if shape.is_empty() {
        1
    } else {
        shape.iter().product()
    }
}

/// Compute the default strides (in **element units**) for `shape` under
/// `order`.
///
/// Row-major produces `[..., s2, s1, 1]` where `s_k = prod(shape[k+1..])`;
/// column-major is the mirror image.
pub fn shape_to_strides(shape: &[usize], order: Order) -> Vec<isize> {
    let ndims = shape.len();
    let mut strides = vec![0isize; ndims];
    if ndims == 0 {
        return strides;
    }
    match order {
        Order::RowMajor => {
            let mut acc: isize = 1;
            for k in (0..ndims).rev() {
                strides[k] = acc;
                acc *= shape[k] as isize;
            }
        }
        Order::ColumnMajor => {
            let mut acc: isize = 1;
            for k in 0..ndims {
                strides[k] = acc;
                acc *= shape[k] as isize;
            }
        }
    }
    strides
}

/// The non-negative byte (or element, depending on `strides`' unit) offset
/// of the first reachable element: the sum, over axes with negative
/// stride, of `-strides[i] * (shape[i] - 1)`.
pub fn strides_to_offset(shape: &[usize], strides: &[isize]) -> isize {
    shape
        .iter()
        .zip(strides.iter())
        .filter(|&(_, &s)| s < 0)
        .map(|(&d, &s)| -s * (d.saturating_sub(1) as isize))
        .sum()
}

/// `0` (neither), `1` (row-major), `2` (column-major), or `3` (both),
/// based on whether the absolute strides are non-increasing, non-decreasing,
/// or constant across axes (axes of size `<= 1` are ignored since their
/// stride is a free choice).
pub fn strides_to_order(strides: &[isize]) -> i32 {
    if strides.len() <= 1 {
        return 3;
    }
    let abs: Vec<isize> = strides.iter().map(|s| s.abs()).collect();
    let non_increasing = abs.windows(2).all(|w| w[0] >= w[1]);
    let non_decreasing = abs.windows(2).all(|w| w[0] <= w[1]);
    match (non_increasing, non_decreasing) {
        (true, true) => 3,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 0,
    }
}

/// `1` if all strides are `>= 0`, `-1` if all are `< 0`, else `0` (mixed).
pub fn iteration_order(strides: &[isize]) -> i32 {
    if strides.iter().all(|&s| s >= 0) {
        1
    } else if strides.iter().all(|&s| s < 0) {
        -1
    } else {
        0
    }
}

/// The smallest and largest byte offsets any legal subscript into
/// `(shape, strides, offset)` can produce.
///
/// If any dimension is `0`, both equal `offset` (there are no legal
/// subscripts, so the view's extent collapses to the single `offset`
/// point).
pub fn minmax_view_buffer_index(shape: &[usize], strides: &[isize], offset: isize) -> (isize, isize) {
    if shape.iter().any(|&d| d == 0) {
        return (offset, offset);
    }
    let mut min = offset;
    let mut max = offset;
    for (&d, &s) in shape.iter().zip(strides.iter()) {
        if d == 0 {
            continue;
        }
        let extent = (d - 1) as isize * s;
        if extent >= 0 {
            max += extent;
        } else {
            min += extent;
        }
    }
    (min, max)
}

/// Convenience wrapper around [`minmax_view_buffer_index`] returning only
/// the maximum reachable byte offset.
#[inline]
pub fn max_view_buffer_index(shape: &[usize], strides: &[isize], offset: isize) -> isize {
    minmax_view_buffer_index(shape, strides, offset).1
}

/// `true` iff the view covers a contiguous span of `bytes_per_element`-sized
/// slots with no gaps: `numel * bytes_per_element == (max - min) + bytes_per_element`
/// and `numel > 0`.
pub fn is_single_segment_compatible(
    bytes_per_element: usize, shape: &[usize], strides: &[isize], offset: isize,
) -> bool {
    let n = numel(shape);
    if n == 0 {
        return false;
    }
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    n as isize * bytes_per_element as isize == (max - min) + bytes_per_element as isize
}

/// `true` iff `buflen` (in elements of `bytes_per_element` width) is large
/// enough to back the view described by `(shape, strides, offset)`: per
/// spec §4.5, accepts iff `min / bytes_per_element >= 0` and
/// `max / bytes_per_element < buflen`.
pub fn is_buffer_length_compatible(
    bytes_per_element: usize, buflen: usize, shape: &[usize], strides: &[isize], offset: isize,
) -> bool {
    if bytes_per_element == 0 {
        return false;
    }
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    let bpe = bytes_per_element as isize;
    min.div_euclid(bpe) >= 0 && max.div_euclid(bpe) < buflen as isize
}

/// `true` iff `strides_to_order` reports row-major (or both).
#[inline]
pub fn is_row_major(strides: &[isize]) -> bool {
    matches!(strides_to_order(strides), 1 | 3)
}

/// `true` iff `strides_to_order` reports column-major (or both).
#[inline]
pub fn is_column_major(strides: &[isize]) -> bool {
    matches!(strides_to_order(strides), 2 | 3)
}

/// `true` iff the view is row-major contiguous: row-major ordered, single
/// segment, non-empty, consistent iteration order.
pub fn is_row_major_contiguous(
    bytes_per_element: usize, shape: &[usize], strides: &[isize], offset: isize,
) -> bool {
    numel(shape) > 0
        && iteration_order(strides) != 0
        && is_single_segment_compatible(bytes_per_element, shape, strides, offset)
        && is_row_major(strides)
}

/// `true` iff the view is column-major contiguous: the mirror of
/// [`is_row_major_contiguous`].
pub fn is_column_major_contiguous(
    bytes_per_element: usize, shape: &[usize], strides: &[isize], offset: isize,
) -> bool {
    numel(shape) > 0
        && iteration_order(strides) != 0
        && is_single_segment_compatible(bytes_per_element, shape, strides, offset)
        && is_column_major(strides)
}

/// Axes whose extent is `1`.
pub fn singleton_dimensions(shape: &[usize]) -> Vec<usize> {
    shape.iter().enumerate().filter(|&(_, &d)| d == 1).map(|(i, _)| i).collect()
}

/// Axes whose extent is not `1`.
pub fn nonsingleton_dimensions(shape: &[usize]) -> Vec<usize> {
    shape.iter().enumerate().filter(|&(_, &d)| d != 1).map(|(i, _)| i).collect()
}

/// NumPy-compatible right-aligned broadcasting of a batch of shapes.
///
/// Output rank is the maximum input rank; each output axis is the unique
/// non-unit input extent among the broadcasting candidates at that axis, or
/// `1` if all candidates are `1`. Fails with `ErrorKind::BroadcastFailure`
/// when two axes disagree on a non-unit extent.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>, CoreError> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; ndim];
    for &shape in shapes {
        let k = ndim - shape.len();
        for (i, &d) in shape.iter().enumerate() {
            let slot = &mut out[i + k];
            if d == *slot || d == 1 {
                continue;
            }
            if *slot == 1 {
                *slot = d;
            } else {
                return Err(CoreError::broadcast_failure(&out, shape));
            }
        }
    }
    Ok(out)
}
