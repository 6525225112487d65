//! Reward and decay arithmetic.
//!
//! Both functions are pure. Rates are percentages scaled by
//! [`FIXED_POINT_BASE`]; quantities are plain `u128` amounts.
//!
//! Rounding always favors the campaign: rewards round down, the distributed
//! fraction rounds up and the decayed rate rounds down, so a computed rate
//! never exceeds its exact real value.

use taper_core::constants::{FIXED_POINT_BASE, RATE_DENOMINATOR};
use taper_core::error::MathError;
use taper_core::math::{mul_div, Rounding};
use taper_core::types::{Amount, Rate};

/// Reward owed for a voucher of `claimed_quantity`.
///
/// `min(claimed_quantity, remaining_ceiling) * discount_rate / (100 * base)`,
/// rounded down. Capping at the ceiling bounds payouts once the remaining
/// ceiling is smaller than the transacted quantity.
///
/// # Examples
///
/// ```
/// use taper_core::constants::percent;
/// use taper_ledger::compute_reward;
/// assert_eq!(compute_reward(500, 1000, percent(10)).unwrap(), 50);
/// // Capped at the ceiling.
/// assert_eq!(compute_reward(2000, 950, percent(10)).unwrap(), 95);
/// ```
pub fn compute_reward(
    claimed_quantity: Amount,
    remaining_ceiling: Amount,
    discount_rate: Rate,
) -> Result<Amount, MathError> {
    let effective = claimed_quantity.min(remaining_ceiling);
    mul_div(effective, discount_rate, RATE_DENOMINATOR, Rounding::Down)
}

/// Discount rate after `distributed` of `budget` has been paid out.
///
/// `max_rate * (1 - distributed / budget)` with the ratio evaluated as a
/// fixed-point fraction. Returns 0 once `distributed >= budget` and for a
/// zero budget.
///
/// # Examples
///
/// ```
/// use taper_core::constants::{percent, FIXED_POINT_BASE};
/// use taper_ledger::decayed_rate;
/// // 10% * (1 - 50/1000) = 9.5%
/// assert_eq!(decayed_rate(percent(10), 50, 1000).unwrap(), 95 * FIXED_POINT_BASE / 10);
/// assert_eq!(decayed_rate(percent(10), 1000, 1000).unwrap(), 0);
/// ```
pub fn decayed_rate(max_rate: Rate, distributed: Amount, budget: Amount) -> Result<Rate, MathError> {
    if budget == 0 || distributed >= budget {
        return Ok(0);
    }
    let fraction = mul_div(distributed, FIXED_POINT_BASE, budget, Rounding::Up)?;
    // distributed < budget, so the rounded-up fraction is at most 1.0.
    let retained = FIXED_POINT_BASE.saturating_sub(fraction);
    mul_div(max_rate, retained, FIXED_POINT_BASE, Rounding::Down)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use taper_core::constants::{percent, MAX_DISCOUNT_RATE};

    // --- compute_reward ---

    #[test]
    fn reward_below_ceiling_uses_quantity() {
        assert_eq!(compute_reward(500, 1000, percent(10)).unwrap(), 50);
    }

    #[test]
    fn reward_above_ceiling_uses_ceiling() {
        // 950 * 9.5% = 90.25 -> 90
        let rate = 95 * FIXED_POINT_BASE / 10;
        assert_eq!(compute_reward(2000, 950, rate).unwrap(), 90);
    }

    #[test]
    fn reward_rounds_down() {
        // 9 * 10% = 0.9 -> 0
        assert_eq!(compute_reward(9, 1000, percent(10)).unwrap(), 0);
    }

    #[test]
    fn reward_zero_rate() {
        assert_eq!(compute_reward(1_000_000, 1_000_000, 0).unwrap(), 0);
    }

    #[test]
    fn reward_zero_ceiling() {
        assert_eq!(compute_reward(1_000_000, 0, percent(50)).unwrap(), 0);
    }

    #[test]
    fn reward_large_quantities_do_not_overflow() {
        let q = u128::MAX / 2;
        assert_eq!(compute_reward(q, q, MAX_DISCOUNT_RATE).unwrap(), q);
        assert_eq!(compute_reward(q, q, percent(50)).unwrap(), q / 2);
    }

    // --- decayed_rate ---

    #[test]
    fn rate_unchanged_before_distribution() {
        assert_eq!(decayed_rate(percent(10), 0, 1000).unwrap(), percent(10));
    }

    #[test]
    fn rate_decays_proportionally() {
        assert_eq!(decayed_rate(percent(10), 500, 1000).unwrap(), percent(5));
        assert_eq!(decayed_rate(percent(10), 250, 1000).unwrap(), percent(10) * 3 / 4);
    }

    #[test]
    fn rate_partial_distribution_is_not_truncated_to_full_rate() {
        // A truncating integer ratio would yield 1 - 1/1000 == 1 here.
        let rate = decayed_rate(percent(10), 1, 1000).unwrap();
        assert!(rate < percent(10));
        assert_eq!(rate, percent(10) * 999 / 1000);
    }

    #[test]
    fn rate_zero_when_exhausted() {
        assert_eq!(decayed_rate(percent(10), 1000, 1000).unwrap(), 0);
        assert_eq!(decayed_rate(percent(10), 1001, 1000).unwrap(), 0);
    }

    #[test]
    fn rate_zero_for_zero_budget() {
        assert_eq!(decayed_rate(percent(10), 0, 0).unwrap(), 0);
    }

    #[test]
    fn rate_rounds_toward_campaign() {
        // 1/3 distributed: exact rate is 10% * 2/3 = 6.666..%
        let rate = decayed_rate(percent(10), 1, 3).unwrap();
        assert!(rate <= percent(10) * 2 / 3);
    }

    proptest! {
        #[test]
        fn reward_bounded_by_ceiling_and_quantity(
            q in any::<u128>(),
            ceiling in any::<u128>(),
            rate in 0u128..=MAX_DISCOUNT_RATE,
        ) {
            let r = compute_reward(q, ceiling, rate).unwrap();
            prop_assert!(r <= q.min(ceiling));
        }

        #[test]
        fn rate_monotonic_in_distributed(
            budget in 1u128..=u128::MAX / 2,
            a in any::<u128>(),
            b in any::<u128>(),
            max_rate in 0u128..=MAX_DISCOUNT_RATE,
        ) {
            let (a, b) = (a % budget, b % budget);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r_lo = decayed_rate(max_rate, lo, budget).unwrap();
            let r_hi = decayed_rate(max_rate, hi, budget).unwrap();
            prop_assert!(r_hi <= r_lo, "rate increased: r({})={} < r({})={}", lo, r_lo, hi, r_hi);
        }

        #[test]
        fn rate_bounded_by_max(
            budget in 1u128..=u128::MAX,
            distributed in any::<u128>(),
            max_rate in 0u128..=MAX_DISCOUNT_RATE,
        ) {
            prop_assert!(decayed_rate(max_rate, distributed, budget).unwrap() <= max_rate);
        }
    }
}
