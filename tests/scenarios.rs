// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ndarray_core::descriptor::{NdArrayDescriptor, Value};
use ndarray_core::{apply, shape, DType, IndexMode, Order};

fn f64_buffer(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

#[test]
fn row_major_contiguous_read() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![2, 3],
        vec![24, 8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let buf = f64_buffer(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(d.iget(&buf, 4).unwrap(), Value::F64(5.0));
    assert_eq!(d.get(&buf, &[1, 1]).unwrap(), Value::F64(5.0));
}

#[test]
fn column_major_contiguous_read() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![2, 3],
        vec![8, 16],
        0,
        Order::ColumnMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let buf = f64_buffer(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(d.get(&buf, &[0, 2]).unwrap(), Value::F64(5.0));
}

#[test]
fn negative_stride_with_nonzero_offset() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![3],
        vec![-8],
        16,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let buf = f64_buffer(&[10.0, 20.0, 30.0]);
    assert_eq!(d.iget(&buf, 0).unwrap(), Value::F64(30.0));
    assert_eq!(d.iget(&buf, 2).unwrap(), Value::F64(10.0));
    assert_eq!(d.view_index_of(16).unwrap(), 0);
}

#[test]
fn wrap_index_mode() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![5],
        vec![8],
        0,
        Order::RowMajor,
        IndexMode::Wrap,
        vec![IndexMode::Wrap],
    );
    let buf = f64_buffer(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(d.iget(&buf, -1).unwrap(), d.iget(&buf, 4).unwrap());
    assert_eq!(d.iget(&buf, 7).unwrap(), d.iget(&buf, 2).unwrap());
}

#[test]
fn broadcast_compatibility() {
    assert_eq!(shape::broadcast_shapes(&[&[8, 1, 6, 1], &[7, 1, 5]]).unwrap(), vec![8, 7, 6, 5]);
    assert!(shape::broadcast_shapes(&[&[3], &[4]]).is_err());
}

#[test]
fn unary_apply_2d_square_matches_blocked_and_unblocked() {
    let input = NdArrayDescriptor::new(
        DType::Float64,
        vec![2, 2],
        vec![16, 8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let output = NdArrayDescriptor::new(
        DType::Float64,
        vec![2, 2],
        vec![16, 8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let in_buf = f64_buffer(&[1.0, 2.0, 3.0, 4.0]);

    let square = |v: Value| match v {
        Value::F64(x) => Ok(Value::F64(x * x)),
        _ => unreachable!(),
    };

    let mut blocked_out = vec![0u8; 32];
    apply::apply_unary(&input, &in_buf, &output, &mut blocked_out, square).unwrap();
    assert_eq!(output.get(&blocked_out, &[0, 0]).unwrap(), Value::F64(1.0));
    assert_eq!(output.get(&blocked_out, &[0, 1]).unwrap(), Value::F64(4.0));
    assert_eq!(output.get(&blocked_out, &[1, 0]).unwrap(), Value::F64(9.0));
    assert_eq!(output.get(&blocked_out, &[1, 1]).unwrap(), Value::F64(16.0));

    // a single-element-at-a-time traversal (rank 1 path, reshaped view) must
    // agree bit-for-bit with the blocked 2-D variant
    let flat_in = NdArrayDescriptor::new(
        DType::Float64,
        vec![4],
        vec![8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let flat_out = NdArrayDescriptor::new(
        DType::Float64,
        vec![4],
        vec![8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let mut flat_result = vec![0u8; 32];
    apply::apply_unary(&flat_in, &in_buf, &flat_out, &mut flat_result, square).unwrap();
    assert_eq!(flat_result, blocked_out);
}

#[test]
fn sqrt_then_square_is_approximately_identity() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![3],
        vec![8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let in_buf = f64_buffer(&[2.0, 3.0, 5.0]);

    let mut sqrt_buf = vec![0u8; 24];
    apply::apply_unary(&d, &in_buf, &d, &mut sqrt_buf, |v| match v {
        Value::F64(x) => Ok(Value::F64(x.sqrt())),
        _ => unreachable!(),
    })
    .unwrap();

    let mut squared_buf = vec![0u8; 24];
    apply::apply_unary(&d, &sqrt_buf, &d, &mut squared_buf, |v| match v {
        Value::F64(x) => Ok(Value::F64(x * x)),
        _ => unreachable!(),
    })
    .unwrap();

    for (i, &expected) in [2.0, 3.0, 5.0].iter().enumerate() {
        match d.get(&squared_buf, &[i as isize]).unwrap() {
            Value::F64(actual) => approx::assert_relative_eq!(actual, expected, epsilon = 1e-12),
            _ => unreachable!(),
        }
    }
}

#[test]
fn identity_apply_is_bit_equal_to_input() {
    let d = NdArrayDescriptor::new(
        DType::Float64,
        vec![3, 3],
        vec![24, 8],
        0,
        Order::RowMajor,
        IndexMode::Error,
        vec![IndexMode::Error],
    );
    let in_buf = f64_buffer(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    let mut out_buf = vec![0u8; in_buf.len()];
    apply::apply_unary(&d, &in_buf, &d, &mut out_buf, Ok).unwrap();
    assert_eq!(in_buf, out_buf);
}
