// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The unary apply engine: element-wise transform of one input descriptor
//! into one (or two) output descriptors of the same shape.
//!
//! The teacher crate's own element-wise engine (`zip::Zip`/`NdProducer`) is
//! generic over `D: Dimension` rather than unrolled per rank; this engine
//! follows the same shape — one rank-generic traversal (`blocked::apply`,
//! loop-interchanged and cache-blocked over the innermost axis), specialized
//! only for the 0-D and 1-D cases where the general multi-axis bookkeeping
//! is pure overhead. There is no per-rank code generation.
//!
//! Validation is entirely up front: shape agreement and buffer length are
//! checked once before the loop starts, not re-checked on every element. A
//! callback that itself returns `Err` aborts the traversal at that element.

mod blocked;

use crate::descriptor::{NdArrayDescriptor, Value};
use crate::error::{CoreError, CoreResult};

fn check_same_shape(a: &NdArrayDescriptor, b: &NdArrayDescriptor) -> CoreResult<()> {
    if a.shape() != b.shape() {
        return Err(CoreError::shape_mismatch(a.shape(), b.shape()));
    }
    Ok(())
}

/// Apply `f` to every element of `input`, writing results into `output`.
///
/// `input` and `output` must have identical shape (not merely the same
/// `numel`); their strides, order, dtype and index modes may all differ.
pub fn apply_unary<F>(
    input: &NdArrayDescriptor, in_buf: &[u8], output: &NdArrayDescriptor, out_buf: &mut [u8], mut f: F,
) -> CoreResult<()>
where
    F: FnMut(Value) -> CoreResult<Value>,
{
    check_same_shape(input, output)?;
    input.validate_buffer(in_buf)?;
    output.validate_buffer(out_buf)?;

    match input.ndims() {
        0 => {
            let value = input.iget(in_buf, 0)?;
            output.iset(out_buf, 0, f(value)?)
        }
        1 => apply_rank1(input, in_buf, output, out_buf, &mut f),
        _ => blocked::apply(input, in_buf, output, out_buf, &mut f),
    }
}

fn apply_rank1<F>(
    input: &NdArrayDescriptor, in_buf: &[u8], output: &NdArrayDescriptor, out_buf: &mut [u8], f: &mut F,
) -> CoreResult<()>
where
    F: FnMut(Value) -> CoreResult<Value>,
{
    for i in 0..input.length() {
        let idx = i as isize;
        let value = input.iget(in_buf, idx)?;
        output.iset(out_buf, idx, f(value)?)?;
    }
    Ok(())
}

/// Apply `f` to every element of `input`, writing its two results into
/// `output1` and `output2` (same shape as `input`).
///
/// Used for operations that split one input into a pair of outputs, e.g.
/// `modf`/`frexp`-style decompositions.
pub fn apply_unary_two_outputs<F>(
    input: &NdArrayDescriptor, in_buf: &[u8], output1: &NdArrayDescriptor, out_buf1: &mut [u8],
    output2: &NdArrayDescriptor, out_buf2: &mut [u8], mut f: F,
) -> CoreResult<()>
where
    F: FnMut(Value) -> CoreResult<(Value, Value)>,
{
    check_same_shape(input, output1)?;
    check_same_shape(input, output2)?;
    input.validate_buffer(in_buf)?;
    output1.validate_buffer(out_buf1)?;
    output2.validate_buffer(out_buf2)?;

    for i in 0..input.length() {
        let idx = i as isize;
        let value = input.iget(in_buf, idx)?;
        let (v1, v2) = f(value)?;
        output1.iset(out_buf1, idx, v1)?;
        output2.iset(out_buf2, idx, v2)?;
    }
    Ok(())
}
