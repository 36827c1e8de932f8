// Copyright 2014-2016 bluss and ndarray developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Declared memory/iteration order of an array descriptor.
///
/// - `RowMajor` means that the index along the last axis is the most rapidly changing.
/// - `ColumnMajor` means that the index along the first axis is the most rapidly changing.
///
/// Given a sequence like: 1, 2, 3, 4, 5, 6
///
/// Laid out in a 2 x 3 matrix using row major ordering:
///
/// ```text
/// 1  2  3
/// 4  5  6
/// ```
///
/// Laid out using column major ordering:
///
/// ```text
/// 1  3  5
/// 2  4  6
/// ```
///
/// The orderings have common short names, also seen in other environments: row major is
/// called "C" order (after the C programming language) and column major is called "F" or
/// "Fortran" order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Order {
    /// Row major or "C" order: the last axis varies fastest.
    RowMajor,
    /// Column major or "F" order: the first axis varies fastest.
    ColumnMajor,
}

impl Order {
    /// "C" is an alias for row major ordering
    pub const C: Order = Order::RowMajor;

    /// "F" (for Fortran) is an alias for column major ordering
    pub const F: Order = Order::ColumnMajor;

    /// Return true if input is `Order::RowMajor`, false otherwise
    #[inline]
    pub fn is_row_major(self) -> bool {
        matches!(self, Order::RowMajor)
    }

    /// Return true if input is `Order::ColumnMajor`, false otherwise
    #[inline]
    pub fn is_column_major(self) -> bool {
        !self.is_row_major()
    }

    /// Return `Order::RowMajor` if the input is true, `Order::ColumnMajor` otherwise
    #[inline]
    pub fn row_major(row_major: bool) -> Order {
        if row_major { Order::RowMajor } else { Order::ColumnMajor }
    }

    /// Return `Order::ColumnMajor` if the input is true, `Order::RowMajor` otherwise
    #[inline]
    pub fn column_major(column_major: bool) -> Order {
        Self::row_major(!column_major)
    }

    /// Return the transpose: row major becomes column major and vice versa.
    #[inline]
    pub fn transpose(self) -> Order {
        match self {
            Order::RowMajor => Order::ColumnMajor,
            Order::ColumnMajor => Order::RowMajor,
        }
    }
}
