//! Adversarial property-based tests for Taper campaigns.
//!
//! These tests drive randomized claim sequences through the registry and
//! check the payout invariants after every step.
//!
//! Attack vectors tested:
//! - Double redemption of a voucher
//! - Payout beyond the funded budget
//! - Rate increases across claims
//! - Ceiling drift (decrement by anything other than the paid reward)
//! - Duplicate campaign creation for a market
//! - Claim marks from any identity other than the voucher's ledger

use proptest::prelude::*;
use taper_core::constants::{percent, RATE_DENOMINATOR};
use taper_core::error::{LedgerError, RegistryError};
use taper_core::traits::AssetTransfer;
use taper_core::types::*;
use taper_tests::helpers::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Paid rewards move the ledger state by exactly the reward, the rate
    /// never rises, and total payout never exceeds the budget.
    #[test]
    fn claim_sequence_invariants(
        budget in 1u128..=1_000_000_000_000u128,
        rate_percent in 1u128..=100,
        quantities in prop::collection::vec(1u128..=2_000_000_000_000u128, 1..24),
    ) {
        let (mut reg, ledger) = registry_with_campaign(budget, rate_percent);

        for (i, q) in quantities.iter().enumerate() {
            let before = reg.ledger(&ledger).unwrap().clone();
            let expected = before.compute_reward(*q).unwrap();
            let v = issue(&mut reg, ledger, acct(i as u8), *q);

            match reg.claim(&ledger, &v) {
                Ok(receipt) => {
                    let after = reg.ledger(&ledger).unwrap();
                    prop_assert_eq!(receipt.reward, expected);
                    prop_assert_eq!(
                        after.state().distributed_total,
                        before.state().distributed_total + receipt.reward
                    );
                    prop_assert_eq!(
                        after.state().remaining_ceiling,
                        before.state().remaining_ceiling - receipt.reward
                    );
                    prop_assert!(after.details().discount_rate <= before.details().discount_rate);
                    prop_assert!(reg.voucher(&v).unwrap().claimed);
                }
                Err(RegistryError::Ledger(LedgerError::RewardExpired)) => {
                    prop_assert_eq!(expected, 0);
                    prop_assert_eq!(reg.ledger(&ledger).unwrap(), &before);
                    prop_assert!(!reg.voucher(&v).unwrap().claimed);
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }

            let l = reg.ledger(&ledger).unwrap();
            prop_assert!(l.state().distributed_total <= budget);
            prop_assert_eq!(
                l.state().distributed_total + l.state().remaining_ceiling,
                budget
            );
            prop_assert_eq!(
                reg.bank().balance_of(&ledger, &REWARD),
                budget - l.state().distributed_total
            );
        }
    }

    /// `compute_reward` follows the capped formula exactly.
    #[test]
    fn compute_reward_formula(
        budget in 1u128..=1_000_000_000_000_000_000,
        rate_percent in 0u128..=100,
        q in 0u128..=1_000_000_000_000_000_000,
    ) {
        let (reg, ledger) = registry_with_campaign(budget, rate_percent);
        let l = reg.ledger(&ledger).unwrap();
        let ceiling = l.state().remaining_ceiling;
        let expected = q.min(ceiling) * percent(rate_percent) / RATE_DENOMINATOR;
        prop_assert_eq!(l.compute_reward(q).unwrap(), expected);
    }

    /// A voucher pays out at most once, however often it is presented.
    #[test]
    fn voucher_redeems_at_most_once(q in 10u128..=1_000_000, attempts in 2usize..6) {
        let (mut reg, ledger) = registry_with_campaign(1_000_000, 10);
        let v = issue(&mut reg, ledger, acct(1), q);
        let first = reg.claim(&ledger, &v).unwrap();
        for _ in 1..attempts {
            prop_assert_eq!(
                reg.claim(&ledger, &v),
                Err(RegistryError::Ledger(LedgerError::AlreadyClaimed(v)))
            );
        }
        prop_assert_eq!(reg.bank().balance_of(&acct(1), &REWARD), first.reward);
    }

    /// A market key can hold one campaign regardless of later parameters.
    #[test]
    fn duplicate_campaign_always_rejected(
        budget in 0u128..=1_000,
        rate_percent in 0u128..=200,
        owner_seed in any::<u8>(),
    ) {
        let (mut reg, ledger) = registry_with_campaign(1000, 10);
        let mut d = details(budget, 0);
        d.discount_rate = percent(rate_percent);
        prop_assert_eq!(
            reg.create_campaign(d, POOL, acct(owner_seed), 0),
            Err(RegistryError::CampaignAlreadyExists(POOL))
        );
        prop_assert_eq!(reg.campaign(&POOL).unwrap().ledger, ledger);
    }

    /// Only the voucher's own ledger may flip its claimed flag.
    #[test]
    fn foreign_claim_mark_rejected(seed in any::<[u8; 32]>()) {
        let (mut reg, ledger) = registry_with_campaign(1000, 10);
        let v = issue(&mut reg, ledger, acct(1), 500);
        let caller = AccountId(seed);
        prop_assume!(caller != ledger);
        prop_assert_eq!(
            reg.mark_claimed(&caller, &v),
            Err(RegistryError::NotAuthorized(caller))
        );
        prop_assert!(!reg.voucher(&v).unwrap().claimed);
    }

    /// Recovery is gated to the campaign owner.
    #[test]
    fn recovery_rejected_for_non_owner(seed in any::<[u8; 32]>(), amount in 0u128..=1000) {
        let (mut reg, ledger) = registry_with_campaign(1000, 10);
        let caller = AccountId(seed);
        prop_assume!(caller != OWNER);
        prop_assert_eq!(
            reg.recover_asset(&ledger, &caller, &REWARD, amount),
            Err(RegistryError::NotAuthorized(caller))
        );
        prop_assert_eq!(reg.bank().balance_of(&ledger, &REWARD), 1000);
    }
}
