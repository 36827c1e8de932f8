// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The element data type registry: a closed tag identifying numeric
//! encoding and width, plus byte width, single-letter character code, and
//! position in the casting matrices (`crate::casting`).

use core::mem::size_of;

/// Number of non-sentinel tags; also the dimension of the casting matrices
/// in `crate::casting`.
pub const NUM_DTYPES: usize = 23;

/// Element data type tag.
///
/// `None` and `UserDefinedBase` are sentinels: `None` marks an invalid/absent
/// dtype, `UserDefinedBase` reserves the numeric range above it for future
/// host-defined extension and is never produced by this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    UInt256,
    Uint8Clamped,
    Float16,
    BFloat16,
    Float32,
    Float64,
    Float128,
    Complex64,
    Complex128,
    Binary,
    Generic,
    /// invalid/absent dtype sentinel
    None,
    /// reserved base of the host-extension numeric range
    UserDefinedBase,
}

/// Broad kind used by the same-kind casting table (`crate::casting`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DTypeKind {
    Boolean,
    Integer,
    Float,
    Complex,
    Binary,
    Generic,
    /// sentinels have no kind and are never same-kind compatible with anything
    None,
}

impl DType {
    /// All non-sentinel tags, in the stable order used to index the casting
    /// matrices (see [`DType::cast_index`]).
    pub const ALL: [DType; NUM_DTYPES] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::Int128,
        DType::Int256,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::UInt128,
        DType::UInt256,
        DType::Uint8Clamped,
        DType::Float16,
        DType::BFloat16,
        DType::Float32,
        DType::Float64,
        DType::Float128,
        DType::Complex64,
        DType::Complex128,
        DType::Binary,
        DType::Generic,
    ];

    /// Byte width of a single element, or `0` for a variable/opaque-width
    /// tag (`Generic`, and the sentinels `None`/`UserDefinedBase`).
    #[inline]
    pub const fn byte_width(self) -> usize {
        match self {
            DType::Bool => 1,
            DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 => 4,
            DType::Int64 => 8,
            DType::Int128 => 16,
            DType::Int256 => 32,
            DType::UInt8 => 1,
            DType::UInt16 => 2,
            DType::UInt32 => 4,
            DType::UInt64 => 8,
            DType::UInt128 => 16,
            DType::UInt256 => 32,
            DType::Uint8Clamped => 1,
            DType::Float16 => 2,
            DType::BFloat16 => 2,
            DType::Float32 => 4,
            DType::Float64 => 8,
            DType::Float128 => 16,
            DType::Complex64 => 8,
            DType::Complex128 => 16,
            DType::Binary => 1,
            DType::Generic => 0,
            DType::None => 0,
            DType::UserDefinedBase => 0,
        }
    }

    /// Single-letter character code, part of the external ABI contract
    /// (spec §6). Distinct for every tag (the duplicate letters present in
    /// the upstream C registry are not reproduced here; see `SPEC_FULL.md`).
    #[inline]
    pub const fn char_code(self) -> char {
        match self {
            DType::Float64 => 'd',
            DType::Float32 => 'f',
            DType::Int32 => 'i',
            DType::UInt32 => 'u',
            DType::Int64 => 'l',
            DType::Complex64 => 'c',
            DType::Complex128 => 'z',
            DType::Bool => 'x',
            DType::UInt8 => 'b',
            DType::Int8 => 's',
            DType::Float16 => 'h',
            DType::BFloat16 => 'e',
            DType::Float128 => 'g',
            DType::Binary => 'r',
            DType::Generic => 'o',
            DType::Int16 => 'n',
            DType::UInt16 => 'q',
            DType::UInt64 => 'v',
            DType::Int128 => 'w',
            DType::Int256 => 'y',
            DType::UInt128 => 'j',
            DType::UInt256 => 'k',
            DType::Uint8Clamped => 'p',
            DType::None => '\0',
            DType::UserDefinedBase => '\0',
        }
    }

    /// Broad kind, used by the same-kind casting table.
    #[inline]
    pub const fn kind(self) -> DTypeKind {
        match self {
            DType::Bool => DTypeKind::Boolean,
            DType::Int8
            | DType::Int16
            | DType::Int32
            | DType::Int64
            | DType::Int128
            | DType::Int256
            | DType::UInt8
            | DType::UInt16
            | DType::UInt32
            | DType::UInt64
            | DType::UInt128
            | DType::UInt256
            | DType::Uint8Clamped => DTypeKind::Integer,
            DType::Float16 | DType::BFloat16 | DType::Float32 | DType::Float64 | DType::Float128 => {
                DTypeKind::Float
            }
            DType::Complex64 | DType::Complex128 => DTypeKind::Complex,
            DType::Binary => DTypeKind::Binary,
            DType::Generic => DTypeKind::Generic,
            DType::None | DType::UserDefinedBase => DTypeKind::None,
        }
    }

    /// Position in the casting matrices, or `None` for a sentinel tag.
    #[inline]
    pub fn cast_index(self) -> Option<usize> {
        DType::ALL.iter().position(|&d| d == self)
    }

    /// Whether this tag participates in typed element access
    /// (`get`/`set`/`get_ptr_value`/`set_ptr_value`). Tags backed by a real
    /// fixed-layout Rust (or `num-complex`/`half`) type are supported;
    /// variable/opaque-width and wider-than-128-bit tags are not, matching
    /// spec §4.4's "supported read/write set" contract.
    #[inline]
    pub const fn is_typed(self) -> bool {
        match self {
            DType::Bool
            | DType::Int8
            | DType::Int16
            | DType::Int32
            | DType::Int64
            | DType::Int128
            | DType::UInt8
            | DType::UInt16
            | DType::UInt32
            | DType::UInt64
            | DType::UInt128
            | DType::Uint8Clamped
            | DType::Float32
            | DType::Float64
            | DType::Complex64
            | DType::Complex128
            | DType::Binary => true,
            DType::Float16 | DType::BFloat16 => cfg!(feature = "half"),
            _ => false,
        }
    }
}

/// A saturating `uint8` wrapper: assignment clamps to `[0, 255]` instead of
/// wrapping. Backing representation is a single `u8`, identical in layout
/// to [`DType::UInt8`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Uint8Clamped(pub u8);

impl Uint8Clamped {
    /// Clamp `value` into `[0, 255]` and wrap it.
    #[inline]
    pub fn saturating_from_i64(value: i64) -> Self {
        Uint8Clamped(value.clamp(0, 255) as u8)
    }
}

impl From<u8> for Uint8Clamped {
    #[inline]
    fn from(v: u8) -> Self {
        Uint8Clamped(v)
    }
}

const _: () = assert!(size_of::<Uint8Clamped>() == 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_widths_match_declared_contract() {
        assert_eq!(DType::Float64.byte_width(), 8);
        assert_eq!(DType::Complex128.byte_width(), 16);
        assert_eq!(DType::Generic.byte_width(), 0);
        assert_eq!(DType::None.byte_width(), 0);
    }

    #[test]
    fn char_codes_are_distinct() {
        let mut codes: Vec<char> = DType::ALL.iter().map(|d| d.char_code()).collect();
        codes.sort();
        let mut dedup = codes.clone();
        dedup.dedup();
        assert_eq!(codes.len(), dedup.len(), "duplicate dtype character code");
    }

    #[test]
    fn cast_index_is_stable_and_total_over_all() {
        for (i, d) in DType::ALL.iter().enumerate() {
            assert_eq!(d.cast_index(), Some(i));
        }
        assert_eq!(DType::None.cast_index(), None);
        assert_eq!(DType::UserDefinedBase.cast_index(), None);
    }
}
