// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The general-rank traversal used for 2-D and higher inputs: axes are
//! visited innermost-first in ascending order of `|input.strides[axis]|`
//! (loop interchange, so the fastest-varying input axis is always
//! innermost), and the innermost axis is walked in chunks of
//! [`block_size`] rather than one element at a time (cache blocking).

use crate::descriptor::{NdArrayDescriptor, Value};
use crate::error::CoreResult;

/// Target block footprint, in bytes, for the innermost axis.
const BLOCK_SIZE_IN_BYTES: usize = 64;
/// Fallback block length, in elements, used when an operand has a
/// zero-width (opaque) element type.
const BLOCK_SIZE_IN_ELEMENTS: usize = 8;

/// Number of innermost-axis elements to process per block.
pub(crate) fn block_size(input: &NdArrayDescriptor, output: &NdArrayDescriptor) -> usize {
    let width = input.bytes_per_element().max(output.bytes_per_element());
    if width == 0 {
        BLOCK_SIZE_IN_ELEMENTS
    } else {
        (BLOCK_SIZE_IN_BYTES / width).max(1)
    }
}

/// Axis indices `0..strides.len()`, ordered ascending by `|strides[axis]|`.
/// Insertion sort: the axis counts here never justify an `O(n log n)` sort.
pub(crate) fn axis_order_by_ascending_abs_stride(strides: &[isize]) -> Vec<usize> {
    let mut axes: Vec<usize> = (0..strides.len()).collect();
    for i in 1..axes.len() {
        let mut j = i;
        while j > 0 && strides[axes[j - 1]].unsigned_abs() > strides[axes[j]].unsigned_abs() {
            axes.swap(j - 1, j);
            j -= 1;
        }
    }
    axes
}

/// Advance `sub` by one step in the odometer defined by `axes_order`
/// (fastest-varying axis first); returns `false` once every axis has
/// rolled over (traversal is complete).
fn increment_odometer(sub: &mut [isize], shape: &[usize], axes_order: &[usize]) -> bool {
    for &axis in axes_order {
        sub[axis] += 1;
        if (sub[axis] as usize) < shape[axis] {
            return true;
        }
        sub[axis] = 0;
    }
    false
}

/// Apply `f` element-wise from `input`/`in_buf` into `output`/`out_buf`.
/// Caller guarantees `input.shape() == output.shape()` and that both
/// buffers have already been validated.
pub(crate) fn apply<F>(
    input: &NdArrayDescriptor, in_buf: &[u8], output: &NdArrayDescriptor, out_buf: &mut [u8], f: &mut F,
) -> CoreResult<()>
where
    F: FnMut(Value) -> CoreResult<Value>,
{
    let shape = input.shape().to_vec();
    let ndims = shape.len();
    let axes = axis_order_by_ascending_abs_stride(input.strides());
    let inner_axis = axes[0];
    let block = block_size(input, output);

    let mut sub = vec![0isize; ndims];
    loop {
        let extent = shape[inner_axis] as isize;
        let mut start = 0isize;
        while start < extent {
            let end = (start + block as isize).min(extent);
            for v in start..end {
                sub[inner_axis] = v;
                let value = input.get(in_buf, &sub)?;
                let transformed = f(value)?;
                output.set(out_buf, &sub, transformed)?;
            }
            start = end;
        }
        sub[inner_axis] = 0;
        if !increment_odometer(&mut sub, &shape, &axes[1..]) {
            break;
        }
    }
    Ok(())
}
