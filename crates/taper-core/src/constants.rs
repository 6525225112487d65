//! Protocol constants. All quantities are `u128` in the asset's smallest unit.

/// Scale of every fixed-point value (1.0 == `FIXED_POINT_BASE`).
pub const FIXED_POINT_BASE: u128 = 1_000_000_000_000_000_000;

/// Discount rates are percentages scaled by [`FIXED_POINT_BASE`], so a
/// `quantity * rate` product is normalized by `100 * FIXED_POINT_BASE`.
///
/// # Examples
///
/// ```
/// use taper_core::constants::{FIXED_POINT_BASE, RATE_DENOMINATOR};
/// // 10% of 500 units.
/// let rate = 10 * FIXED_POINT_BASE;
/// assert_eq!(500 * rate / RATE_DENOMINATOR, 50);
/// ```
pub const RATE_DENOMINATOR: u128 = 100 * FIXED_POINT_BASE;

/// A discount rate of 100%: the reward equals the transacted quantity.
pub const MAX_DISCOUNT_RATE: u128 = RATE_DENOMINATOR;

/// Domain tag mixed into derived ledger identities.
pub const LEDGER_ID_DOMAIN: &[u8] = b"taper/ledger/v1";

/// Domain tag mixed into derived voucher identifiers.
pub const VOUCHER_ID_DOMAIN: &[u8] = b"taper/voucher/v1";

/// Build a discount rate from a whole percentage.
///
/// # Examples
///
/// ```
/// use taper_core::constants::{percent, FIXED_POINT_BASE};
/// assert_eq!(percent(10), 10 * FIXED_POINT_BASE);
/// ```
pub const fn percent(whole: u128) -> u128 {
    whole * FIXED_POINT_BASE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_rate_is_one_hundred_percent() {
        assert_eq!(MAX_DISCOUNT_RATE, percent(100));
    }

    #[test]
    fn domains_are_distinct() {
        assert_ne!(LEDGER_ID_DOMAIN, VOUCHER_ID_DOMAIN);
    }
}
