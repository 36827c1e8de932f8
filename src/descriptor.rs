// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The array descriptor: dtype, shape, strides, offset, order, index modes
//! and flags, plus typed element access by subscript, by view-linear index,
//! and by raw byte pointer.
//!
//! Unlike the teacher crate's `ArrayBase<S, D>` (generic over a
//! compile-time-ranked `Dimension` and a storage type `S`), this descriptor
//! is a plain runtime-typed record: rank, dtype and strides are all runtime
//! values, and element access reads/writes a caller-supplied byte buffer
//! rather than owning one. This matches spec §4's "array descriptor" record,
//! which has no compile-time rank or storage parameter.

use num_complex::Complex;
#[cfg(feature = "half")]
use half::{bf16, f16};

use crate::coord::{bind_to_vind, ind_to_sub, sub_to_ind, vind_to_bind};
use crate::dtype::{DType, Uint8Clamped};
use crate::error::{CoreError, CoreResult};
use crate::index_mode::{resolve_index, IndexMode, OUT_OF_BOUNDS};
use crate::layout::{Flags, COLUMN_MAJOR_CONTIGUOUS, ROW_MAJOR_CONTIGUOUS};
use crate::order::Order;
use crate::shape::{is_buffer_length_compatible, is_column_major_contiguous, is_row_major_contiguous, numel};

/// A single axis index, distinct from a plain subscript or extent value.
/// Mirrors the teacher crate's `Axis` newtype.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Axis(pub usize);

/// A decoded element value, tagged by the dtype it was read under.
///
/// Only the tags [`DType::is_typed`] accepts have a `Value` variant; reading
/// or writing any other tag fails with `ErrorKind::UnknownDType`.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U8Clamped(Uint8Clamped),
    #[cfg(feature = "half")]
    F16(f16),
    #[cfg(feature = "half")]
    BF16(bf16),
    F32(f32),
    F64(f64),
    C64(Complex<f32>),
    C128(Complex<f64>),
    /// a single raw byte, for `DType::Binary`
    Byte(u8),
}

fn read_value(dtype: DType, bytes: &[u8]) -> CoreResult<Value> {
    if !dtype.is_typed() {
        return Err(CoreError::unknown_dtype(dtype.char_code() as i32));
    }
    Ok(match dtype {
        DType::Bool => Value::Bool(bytes[0] != 0),
        DType::Int8 => Value::I8(bytes[0] as i8),
        DType::Int16 => Value::I16(i16::from_ne_bytes(bytes[..2].try_into().unwrap())),
        DType::Int32 => Value::I32(i32::from_ne_bytes(bytes[..4].try_into().unwrap())),
        DType::Int64 => Value::I64(i64::from_ne_bytes(bytes[..8].try_into().unwrap())),
        DType::Int128 => Value::I128(i128::from_ne_bytes(bytes[..16].try_into().unwrap())),
        DType::UInt8 => Value::U8(bytes[0]),
        DType::UInt16 => Value::U16(u16::from_ne_bytes(bytes[..2].try_into().unwrap())),
        DType::UInt32 => Value::U32(u32::from_ne_bytes(bytes[..4].try_into().unwrap())),
        DType::UInt64 => Value::U64(u64::from_ne_bytes(bytes[..8].try_into().unwrap())),
        DType::UInt128 => Value::U128(u128::from_ne_bytes(bytes[..16].try_into().unwrap())),
        DType::Uint8Clamped => Value::U8Clamped(Uint8Clamped(bytes[0])),
        #[cfg(feature = "half")]
        DType::Float16 => Value::F16(f16::from_ne_bytes(bytes[..2].try_into().unwrap())),
        #[cfg(feature = "half")]
        DType::BFloat16 => Value::BF16(bf16::from_ne_bytes(bytes[..2].try_into().unwrap())),
        DType::Float32 => Value::F32(f32::from_ne_bytes(bytes[..4].try_into().unwrap())),
        DType::Float64 => Value::F64(f64::from_ne_bytes(bytes[..8].try_into().unwrap())),
        DType::Complex64 => Value::C64(Complex::new(
            f32::from_ne_bytes(bytes[0..4].try_into().unwrap()),
            f32::from_ne_bytes(bytes[4..8].try_into().unwrap()),
        )),
        DType::Complex128 => Value::C128(Complex::new(
            f64::from_ne_bytes(bytes[0..8].try_into().unwrap()),
            f64::from_ne_bytes(bytes[8..16].try_into().unwrap()),
        )),
        DType::Binary => Value::Byte(bytes[0]),
        _ => unreachable!("DType::is_typed() guards against reaching here"),
    })
}

fn write_value(dtype: DType, bytes: &mut [u8], value: Value) -> CoreResult<()> {
    if !dtype.is_typed() {
        return Err(CoreError::unknown_dtype(dtype.char_code() as i32));
    }
    match (dtype, value) {
        (DType::Bool, Value::Bool(v)) => bytes[0] = v as u8,
        (DType::Int8, Value::I8(v)) => bytes[0] = v as u8,
        (DType::Int16, Value::I16(v)) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        (DType::Int32, Value::I32(v)) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        (DType::Int64, Value::I64(v)) => bytes[..8].copy_from_slice(&v.to_ne_bytes()),
        (DType::Int128, Value::I128(v)) => bytes[..16].copy_from_slice(&v.to_ne_bytes()),
        (DType::UInt8, Value::U8(v)) => bytes[0] = v,
        (DType::UInt16, Value::U16(v)) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        (DType::UInt32, Value::U32(v)) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        (DType::UInt64, Value::U64(v)) => bytes[..8].copy_from_slice(&v.to_ne_bytes()),
        (DType::UInt128, Value::U128(v)) => bytes[..16].copy_from_slice(&v.to_ne_bytes()),
        (DType::Uint8Clamped, Value::U8Clamped(v)) => bytes[0] = v.0,
        #[cfg(feature = "half")]
        (DType::Float16, Value::F16(v)) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        #[cfg(feature = "half")]
        (DType::BFloat16, Value::BF16(v)) => bytes[..2].copy_from_slice(&v.to_ne_bytes()),
        (DType::Float32, Value::F32(v)) => bytes[..4].copy_from_slice(&v.to_ne_bytes()),
        (DType::Float64, Value::F64(v)) => bytes[..8].copy_from_slice(&v.to_ne_bytes()),
        (DType::Complex64, Value::C64(v)) => {
            bytes[0..4].copy_from_slice(&v.re.to_ne_bytes());
            bytes[4..8].copy_from_slice(&v.im.to_ne_bytes());
        }
        (DType::Complex128, Value::C128(v)) => {
            bytes[0..8].copy_from_slice(&v.re.to_ne_bytes());
            bytes[8..16].copy_from_slice(&v.im.to_ne_bytes());
        }
        (DType::Binary, Value::Byte(v)) => bytes[0] = v,
        _ => return Err(CoreError::cast_not_allowed()),
    }
    Ok(())
}

/// The array descriptor record of spec §4: dtype, rank/shape/strides
/// (strides and offset in bytes), declared order, index modes, cached
/// length/size fields, and the contiguity flags.
#[derive(Clone, Debug)]
pub struct NdArrayDescriptor {
    dtype: DType,
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: isize,
    order: Order,
    imode: IndexMode,
    submodes: Vec<IndexMode>,
    length: usize,
    bytes_per_element: usize,
    byte_length: usize,
    flags: Flags,
}

impl NdArrayDescriptor {
    /// Build a descriptor, caching `length`/`bytes_per_element`/`byte_length`
    /// and computing the contiguity flags from `(shape, strides, offset)`.
    ///
    /// `shape` and `strides` must have equal length, and `submodes` must be
    /// non-empty (it is recycled per axis, same as `sub_to_ind`).
    pub fn new(
        dtype: DType, shape: Vec<usize>, strides: Vec<isize>, offset: isize, order: Order, imode: IndexMode,
        submodes: Vec<IndexMode>,
    ) -> Self {
        assert_eq!(shape.len(), strides.len(), "shape and strides must have equal rank");
        assert!(!submodes.is_empty(), "submodes must be non-empty");

        let length = numel(&shape);
        let bytes_per_element = dtype.byte_width();
        let byte_length = length * bytes_per_element;

        let mut flags = Flags::empty();
        if is_row_major_contiguous(bytes_per_element, &shape, &strides, offset) {
            flags.enable(ROW_MAJOR_CONTIGUOUS);
        }
        if is_column_major_contiguous(bytes_per_element, &shape, &strides, offset) {
            flags.enable(COLUMN_MAJOR_CONTIGUOUS);
        }

        NdArrayDescriptor {
            dtype,
            shape,
            strides,
            offset,
            order,
            imode,
            submodes,
            length,
            bytes_per_element,
            byte_length,
            flags,
        }
    }

    #[inline]
    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    #[inline]
    pub fn imode(&self) -> IndexMode {
        self.imode
    }

    #[inline]
    pub fn submodes(&self) -> &[IndexMode] {
        &self.submodes
    }

    /// Total element count (`numel(shape)`).
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn bytes_per_element(&self) -> usize {
        self.bytes_per_element
    }

    /// `length * bytes_per_element`.
    #[inline]
    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Set `bit` in the descriptor's flags without re-deriving it from
    /// `(shape, strides, offset)`; the caller certifies the bit is correct.
    #[inline]
    pub fn enable_flags(&mut self, bit: u32) {
        self.flags.enable(bit);
    }

    #[inline]
    pub fn disable_flags(&mut self, bit: u32) {
        self.flags.disable(bit);
    }

    #[inline]
    pub fn is_row_major_contiguous(&self) -> bool {
        self.flags.is_row_major_contiguous()
    }

    #[inline]
    pub fn is_column_major_contiguous(&self) -> bool {
        self.flags.is_column_major_contiguous()
    }

    /// `true` iff `buf` is long enough to back this descriptor's view.
    pub fn validate_buffer(&self, buf: &[u8]) -> CoreResult<()> {
        if !is_buffer_length_compatible(self.bytes_per_element, buf.len(), &self.shape, &self.strides, self.offset) {
            return Err(CoreError::incompatible_buffer());
        }
        Ok(())
    }

    fn read_at(&self, buf: &[u8], byte: isize) -> CoreResult<Value> {
        let start = usize::try_from(byte).map_err(|_| CoreError::incompatible_buffer())?;
        let end = start + self.bytes_per_element;
        let slice = buf.get(start..end).ok_or_else(CoreError::incompatible_buffer)?;
        read_value(self.dtype, slice)
    }

    fn write_at(&self, buf: &mut [u8], byte: isize, value: Value) -> CoreResult<()> {
        let start = usize::try_from(byte).map_err(|_| CoreError::incompatible_buffer())?;
        let end = start + self.bytes_per_element;
        let slice = buf.get_mut(start..end).ok_or_else(CoreError::incompatible_buffer)?;
        write_value(self.dtype, slice, value)
    }

    /// Read the element at subscript `sub`.
    ///
    /// A rank-0 descriptor ignores `sub` and reads the single element at
    /// `offset`.
    pub fn get(&self, buf: &[u8], sub: &[isize]) -> CoreResult<Value> {
        self.validate_buffer(buf)?;
        let byte = if self.shape.is_empty() {
            self.offset
        } else {
            sub_to_ind(&self.shape, &self.strides, self.offset, sub, &self.submodes)?
        };
        self.read_at(buf, byte)
    }

    /// Write the element at subscript `sub`.
    pub fn set(&self, buf: &mut [u8], sub: &[isize], value: Value) -> CoreResult<()> {
        self.validate_buffer(buf)?;
        let byte = if self.shape.is_empty() {
            self.offset
        } else {
            sub_to_ind(&self.shape, &self.strides, self.offset, sub, &self.submodes)?
        };
        self.write_at(buf, byte, value)
    }

    /// Resolve a view-linear index to a buffer-linear (byte) position,
    /// taking the fast path for the common row-major-contiguous,
    /// non-negative-stride case and falling back to the general
    /// [`vind_to_bind`] mapping otherwise.
    fn resolve_byte(&self, idx: isize) -> CoreResult<isize> {
        let len = self.length as isize;
        if self.order == Order::RowMajor && self.is_row_major_contiguous() && self.strides.iter().all(|&s| s >= 0) {
            let resolved = resolve_index(idx, len - 1, self.imode);
            if resolved == OUT_OF_BOUNDS && self.imode == IndexMode::Error {
                return Err(CoreError::out_of_bounds(idx, (len - 1).max(0) as usize));
            }
            return Ok(self.offset + resolved * self.bytes_per_element as isize);
        }
        vind_to_bind(&self.shape, &self.strides, self.offset, self.order, idx, self.imode)
    }

    /// Read the element at view-linear index `idx`, resolved under this
    /// descriptor's `imode`.
    ///
    /// A rank-0 descriptor ignores `idx` and reads the single element at
    /// `offset`.
    pub fn iget(&self, buf: &[u8], idx: isize) -> CoreResult<Value> {
        self.validate_buffer(buf)?;
        if self.shape.is_empty() {
            return self.read_at(buf, self.offset);
        }
        let byte = self.resolve_byte(idx)?;
        self.read_at(buf, byte)
    }

    /// Write the element at view-linear index `idx`.
    pub fn iset(&self, buf: &mut [u8], idx: isize, value: Value) -> CoreResult<()> {
        self.validate_buffer(buf)?;
        if self.shape.is_empty() {
            return self.write_at(buf, self.offset, value);
        }
        let byte = self.resolve_byte(idx)?;
        self.write_at(buf, byte, value)
    }

    /// Decompose view-linear index `idx` into subscripts.
    pub fn subscript_at(&self, idx: isize) -> CoreResult<Vec<isize>> {
        ind_to_sub(&self.shape, self.order, idx, self.imode)
    }

    /// Recover the view-linear index of the element stored at buffer-linear
    /// (byte) position `byte`.
    pub fn view_index_of(&self, byte: isize) -> CoreResult<isize> {
        bind_to_vind(&self.shape, &self.strides, self.offset, self.order, byte, self.imode)
    }

    /// Read the element whose first byte is at `ptr`, without any bounds
    /// checking against a backing buffer.
    ///
    /// # Safety
    /// `ptr` must be valid for reads of `self.bytes_per_element()` bytes.
    pub unsafe fn get_ptr_value(&self, ptr: *const u8) -> CoreResult<Value> {
        if !self.dtype.is_typed() {
            return Err(CoreError::unknown_dtype(self.dtype.char_code() as i32));
        }
        let slice = core::slice::from_raw_parts(ptr, self.bytes_per_element);
        read_value(self.dtype, slice)
    }

    /// Write the element whose first byte is at `ptr`, without any bounds
    /// checking against a backing buffer.
    ///
    /// # Safety
    /// `ptr` must be valid for writes of `self.bytes_per_element()` bytes.
    pub unsafe fn set_ptr_value(&self, ptr: *mut u8, value: Value) -> CoreResult<()> {
        if !self.dtype.is_typed() {
            return Err(CoreError::unknown_dtype(self.dtype.char_code() as i32));
        }
        let slice = core::slice::from_raw_parts_mut(ptr, self.bytes_per_element);
        write_value(self.dtype, slice, value)
    }
}
