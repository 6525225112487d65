//! Fixed-point helpers with a 256-bit intermediate product.
//!
//! All arithmetic is integer-only. `a * b / d` is evaluated exactly over
//! 256 bits and only the quotient has to fit a `u128`, so quantities up to
//! `u128::MAX` can be scaled by rates up to `100 * FIXED_POINT_BASE` without
//! overflowing mid-computation.

use crate::error::MathError;

/// Direction in which a non-exact quotient is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

const LOW_MASK: u128 = u64::MAX as u128;

/// Full 256-bit product of two `u128` values as `(high, low)` halves.
fn full_mul(a: u128, b: u128) -> (u128, u128) {
    let (a1, a0) = (a >> 64, a & LOW_MASK);
    let (b1, b0) = (b >> 64, b & LOW_MASK);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    // At most 3 * (2^64 - 1): no overflow.
    let mid = (p00 >> 64) + (p01 & LOW_MASK) + (p10 & LOW_MASK);
    let low = (p00 & LOW_MASK) | ((mid & LOW_MASK) << 64);
    let high = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (high, low)
}

/// Divide the 256-bit value `(high, low)` by `d`, returning `(quotient, remainder)`.
///
/// Requires `high < d` so the quotient fits in 128 bits.
fn div_wide(high: u128, low: u128, d: u128) -> (u128, u128) {
    if high == 0 {
        return (low / d, low % d);
    }
    let mut rem = high;
    let mut quot: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((low >> i) & 1);
        quot <<= 1;
        // rem < d before the shift, so the shifted value is < 2d and one
        // subtraction suffices; with `carry` set the true value exceeds 2^128.
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quot |= 1;
        }
    }
    (quot, rem)
}

/// Compute `a * b / d` with the given rounding.
///
/// # Errors
///
/// - [`MathError::DivisionByZero`] if `d == 0`
/// - [`MathError::ArithmeticOverflow`] if the result does not fit a `u128`
///
/// # Examples
///
/// ```
/// use taper_core::math::{mul_div, Rounding};
/// assert_eq!(mul_div(10, 10, 3, Rounding::Down).unwrap(), 33);
/// assert_eq!(mul_div(10, 10, 3, Rounding::Up).unwrap(), 34);
/// assert_eq!(mul_div(u128::MAX, 4, 8, Rounding::Down).unwrap(), u128::MAX / 2);
/// ```
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Result<u128, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }
    let (high, low) = full_mul(a, b);
    if high >= d {
        return Err(MathError::ArithmeticOverflow);
    }
    let (quot, rem) = div_wide(high, low, d);
    match rounding {
        Rounding::Up if rem != 0 => quot.checked_add(1).ok_or(MathError::ArithmeticOverflow),
        _ => Ok(quot),
    }
}
