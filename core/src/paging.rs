//! Fraction and page-count helpers.

use crate::error::{Error, Result};

/// Whether `value` has a non-zero fractional part.
pub fn has_fraction(value: f64) -> bool {
    value.fract() != 0.0
}

/// Integer part of `value`, truncated toward zero.
pub fn integer_part(value: f64) -> i64 {
    value.trunc() as i64
}

/// Page number for a fractional page position.
///
/// Returns the integer part, incremented by one when a fraction is present:
/// `2.0` is page 2, `2.1` is page 3.
pub fn page_number(value: f64) -> i64 {
    if has_fraction(value) {
        integer_part(value + 1.0)
    } else {
        integer_part(value)
    }
}

/// Number of pages needed for `total` items.
pub fn page_count(total: u64, page_size: u64) -> Result<u64> {
    if page_size == 0 {
        return Err(Error::InvalidPageSize);
    }
    Ok(total.div_ceil(page_size))
}
