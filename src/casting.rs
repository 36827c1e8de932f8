// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Casting modes and the `SAFE`/`SAME_KIND` casting matrices.
//!
//! The matrices are exposed as [`safe_cast_matrix`]/[`same_kind_cast_matrix`],
//! computed from [`is_safe_cast`]/[`is_same_kind_cast`] rather than
//! hand-authored as literal `23 x 23` tables: the predicate form is the
//! single source of truth (easy to audit against the value-preserving
//! definition in spec §4.5), and the matrix form is derived from it and
//! guaranteed consistent with it.

use crate::dtype::{DType, DTypeKind, NUM_DTYPES};
use crate::shape::is_buffer_length_compatible;

pub use crate::shape::is_buffer_length_compatible as buffer_length_compatible;

/// Casting mode, as in spec §4.5/§6.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CastingMode {
    /// no casting at all: only identity is allowed
    No,
    /// equivalent representation required; this implementation has no
    /// byte-order tag, so it collapses to `No` (spec §9)
    Equiv,
    /// value-preserving casts only
    Safe,
    /// casts within the same kind (integer/float/complex/boolean/binary/generic)
    SameKind,
    /// any cast is allowed
    Unsafe,
}

/// The bit width of one element of `d`.
#[inline]
fn bits(d: DType) -> u32 {
    d.byte_width() as u32 * 8
}

/// Mantissa width, for the float tags that carry one; `None` for
/// everything else.
fn mantissa_bits(d: DType) -> Option<u32> {
    match d {
        DType::Float16 => Some(11),
        DType::BFloat16 => Some(8),
        DType::Float32 => Some(24),
        DType::Float64 => Some(53),
        DType::Float128 => Some(113),
        _ => None,
    }
}

fn is_signed_int(d: DType) -> bool {
    matches!(d, DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 | DType::Int128 | DType::Int256)
}

fn is_unsigned_int(d: DType) -> bool {
    matches!(
        d,
        DType::UInt8
            | DType::UInt16
            | DType::UInt32
            | DType::UInt64
            | DType::UInt128
            | DType::UInt256
            | DType::Uint8Clamped
    )
}

fn is_float(d: DType) -> bool {
    mantissa_bits(d).is_some()
}

fn is_complex(d: DType) -> bool {
    matches!(d, DType::Complex64 | DType::Complex128)
}

/// `true` iff converting a value of dtype `from` to dtype `to` can never
/// lose information (spec's "safe cast").
pub fn is_safe_cast(from: DType, to: DType) -> bool {
    if from == to {
        return true;
    }

    if from == DType::Bool {
        return to != DType::None && to != DType::UserDefinedBase && to != DType::Binary && to != DType::Generic;
    }

    if is_signed_int(from) && is_signed_int(to) {
        return bits(to) >= bits(from);
    }
    if is_unsigned_int(from) && is_unsigned_int(to) {
        return bits(to) >= bits(from);
    }
    if is_unsigned_int(from) && is_signed_int(to) {
        return bits(to) > bits(from);
    }
    if is_signed_int(from) && is_unsigned_int(to) {
        return false;
    }

    if (is_signed_int(from) || is_unsigned_int(from)) && is_float(to) {
        // safe only if the float's mantissa can represent every integer
        // value of the source width exactly
        return mantissa_bits(to).unwrap() >= bits(from);
    }

    if is_float(from) && is_float(to) {
        return mantissa_bits(to).unwrap() >= mantissa_bits(from).unwrap();
    }

    if is_complex(from) && is_complex(to) {
        return bits(to) >= bits(from);
    }
    if is_float(from) && is_complex(to) {
        // a complex's real component must exactly represent the source float
        let component_mantissa = match to {
            DType::Complex64 => 24,
            DType::Complex128 => 53,
            _ => unreachable!(),
        };
        return component_mantissa >= mantissa_bits(from).unwrap();
    }

    false
}

/// `true` iff `from` and `to` are within the same kind (spec's "same-kind
/// cast"): integer<->integer, float<->float, complex<->complex,
/// boolean<->boolean, binary<->binary, generic<->generic. Sentinels are
/// never same-kind compatible with anything, including themselves.
pub fn is_same_kind_cast(from: DType, to: DType) -> bool {
    let (kf, kt) = (from.kind(), to.kind());
    kf != DTypeKind::None && kf == kt
}

/// `true` iff `mode` permits casting a value of dtype `from` to dtype `to`.
pub fn is_allowed_data_type_cast(from: DType, to: DType, mode: CastingMode) -> bool {
    match mode {
        CastingMode::Unsafe => true,
        CastingMode::No | CastingMode::Equiv => from == to,
        CastingMode::Safe => is_safe_cast(from, to),
        CastingMode::SameKind => is_same_kind_cast(from, to),
    }
}

/// Materialize the `SAFE_CASTS` matrix, indexed by [`DType::cast_index`].
pub fn safe_cast_matrix() -> [[bool; NUM_DTYPES]; NUM_DTYPES] {
    let mut out = [[false; NUM_DTYPES]; NUM_DTYPES];
    for (i, &from) in DType::ALL.iter().enumerate() {
        for (j, &to) in DType::ALL.iter().enumerate() {
            out[i][j] = is_safe_cast(from, to);
        }
    }
    out
}

/// Materialize the `SAME_KIND_CASTS` matrix, indexed by [`DType::cast_index`].
pub fn same_kind_cast_matrix() -> [[bool; NUM_DTYPES]; NUM_DTYPES] {
    let mut out = [[false; NUM_DTYPES]; NUM_DTYPES];
    for (i, &from) in DType::ALL.iter().enumerate() {
        for (j, &to) in DType::ALL.iter().enumerate() {
            out[i][j] = is_same_kind_cast(from, to);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonal_of_safe_casts_is_all_true() {
        let m = safe_cast_matrix();
        for i in 0..NUM_DTYPES {
            assert!(m[i][i], "SAFE_CASTS[{i}][{i}] should be true");
        }
    }

    #[test]
    fn widening_int_casts_are_safe() {
        assert!(is_safe_cast(DType::Int8, DType::Int32));
        assert!(!is_safe_cast(DType::Int32, DType::Int8));
        assert!(is_safe_cast(DType::UInt16, DType::Int32));
        assert!(!is_safe_cast(DType::UInt32, DType::Int32));
    }

    #[test]
    fn float_widening_is_safe_narrowing_is_not() {
        assert!(is_safe_cast(DType::Float32, DType::Float64));
        assert!(!is_safe_cast(DType::Float64, DType::Float32));
    }

    #[test]
    fn unsafe_mode_allows_everything() {
        assert!(is_allowed_data_type_cast(DType::Float64, DType::Int8, CastingMode::Unsafe));
    }

    #[test]
    fn no_and_equiv_collapse_to_identity() {
        assert!(is_allowed_data_type_cast(DType::Int32, DType::Int32, CastingMode::No));
        assert!(!is_allowed_data_type_cast(DType::Int32, DType::Int64, CastingMode::No));
        assert!(!is_allowed_data_type_cast(DType::Int32, DType::Int64, CastingMode::Equiv));
    }

    #[test]
    fn same_kind_covers_any_width_within_a_kind() {
        assert!(is_allowed_data_type_cast(DType::Float64, DType::Float32, CastingMode::SameKind));
        assert!(!is_allowed_data_type_cast(DType::Float64, DType::Int32, CastingMode::SameKind));
    }

    quickcheck::quickcheck! {
        /// `SAFE_CASTS[t][t]` holds for every registered dtype (spec §8).
        fn safe_casts_diagonal_holds_for_any_dtype(raw: usize) -> bool {
            let t = DType::ALL[raw % NUM_DTYPES];
            is_safe_cast(t, t)
        }
    }

    #[test]
    fn buffer_length_compatible_reexport_works() {
        assert!(buffer_length_compatible(8, 6, &[2, 3], &[24, 8], 0));
        assert!(!is_buffer_length_compatible(8, 5, &[2, 3], &[24, 8], 0));
    }
}
