//! The per-campaign reward ledger.
//!
//! A [`RewardLedger`] owns one campaign's parameters and payout state. It
//! reads vouchers through the registry's [`VoucherStore`], pays rewards via
//! an [`AssetTransfer`] collaborator and asks the store to mark each paid
//! voucher claimed.
//!
//! `claim` borrows the ledger, the voucher store and the transfer
//! collaborator exclusively for its whole duration, so nothing invoked
//! during the payout can re-enter this ledger before the claim commits.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use taper_core::error::{LedgerError, MathError};
use taper_core::traits::{AssetTransfer, VoucherStore};
use taper_core::types::{
    AccountId, Amount, AssetId, CampaignDetails, Rate, Timestamp, VoucherId, VoucherRecord,
};

use crate::decay::{compute_reward, decayed_rate};

/// Payout bookkeeping of a ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    /// Sum of all rewards paid. Only increases.
    pub distributed_total: Amount,
    /// Remaining quantity eligible for reward computation (`maxBuy`).
    /// Starts at the budget and decreases by every reward paid.
    pub remaining_ceiling: Amount,
    /// Discount rate at creation; base of the decay formula. Immutable.
    pub max_discount_rate: Rate,
}

/// Lifecycle phase of a campaign as observed at some instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    /// Claims are accepted.
    Active,
    /// The budget is distributed or the rate has decayed to zero.
    Exhausted,
    /// The expiration time has passed.
    Expired,
}

/// Outcome of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub voucher: VoucherId,
    pub holder: AccountId,
    pub reward: Amount,
    /// Rate in force for the next claim.
    pub discount_rate_after: Rate,
}

/// One campaign's budget, decay state and payout logic.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardLedger {
    identity: AccountId,
    registry: AccountId,
    owner: AccountId,
    details: CampaignDetails,
    state: LedgerState,
}

impl RewardLedger {
    /// Create a ledger seeded with `details`.
    ///
    /// `identity` is also the account the campaign's funds are held in.
    /// `registry` is the only caller allowed to replace the details and
    /// `owner` the only caller allowed to recover assets.
    pub fn new(
        identity: AccountId,
        registry: AccountId,
        owner: AccountId,
        details: CampaignDetails,
    ) -> Self {
        let state = LedgerState {
            distributed_total: 0,
            remaining_ceiling: details.reward_budget,
            max_discount_rate: details.discount_rate,
        };
        Self {
            identity,
            registry,
            owner,
            details,
            state,
        }
    }

    pub fn identity(&self) -> &AccountId {
        &self.identity
    }

    pub fn registry(&self) -> &AccountId {
        &self.registry
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn details(&self) -> &CampaignDetails {
        &self.details
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Reward a voucher of `claimed_quantity` would receive right now.
    ///
    /// Side-effect free. See [`compute_reward`].
    pub fn compute_reward(&self, claimed_quantity: Amount) -> Result<Amount, LedgerError> {
        Ok(compute_reward(
            claimed_quantity,
            self.state.remaining_ceiling,
            self.details.discount_rate,
        )?)
    }

    /// Campaign phase at `now`. Exhaustion takes precedence over expiry.
    ///
    /// The campaign is `Active` strictly before `expiration_time`. This is a
    /// view of the campaign clock only; vouchers issued up to and including
    /// `expiration_time` remain redeemable (see [`validate_voucher`](Self::validate_voucher)).
    pub fn status(&self, now: Timestamp) -> CampaignStatus {
        if self.state.distributed_total >= self.details.reward_budget
            || self.state.remaining_ceiling == 0
            || self.details.discount_rate == 0
        {
            CampaignStatus::Exhausted
        } else if now >= self.details.expiration_time {
            CampaignStatus::Expired
        } else {
            CampaignStatus::Active
        }
    }

    /// Check that `voucher` may be redeemed against this ledger.
    ///
    /// Expiry compares the voucher's issuance time, not the current time,
    /// with the campaign's expiration: a voucher issued while the campaign
    /// was live stays redeemable after expiry.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidVoucher`] if the voucher names another ledger
    /// - [`LedgerError::DiscountExpired`] if it was issued after expiration
    /// - [`LedgerError::AlreadyClaimed`] if it has been claimed
    pub fn validate_voucher(&self, id: &VoucherId, voucher: &VoucherRecord) -> Result<(), LedgerError> {
        if voucher.ledger != self.identity {
            return Err(LedgerError::InvalidVoucher(*id));
        }
        if voucher.issuance_time > self.details.expiration_time {
            return Err(LedgerError::DiscountExpired {
                issued: voucher.issuance_time,
                expires: self.details.expiration_time,
            });
        }
        if voucher.claimed {
            return Err(LedgerError::AlreadyClaimed(*id));
        }
        Ok(())
    }

    /// Redeem voucher `id`: pay its reward to the holder, account for it,
    /// decay the rate and mark the voucher claimed.
    ///
    /// Every check and every arithmetic step runs before the transfer,
    /// including the voucher store's consent to the final claim mark, so a
    /// failure at any point (including a rejected transfer) leaves the
    /// ledger and the voucher untouched and the claim can be retried.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidVoucher`] for an unknown voucher or one
    ///   issued against another ledger
    /// - [`LedgerError::DiscountExpired`], [`LedgerError::AlreadyClaimed`]
    ///   (see [`validate_voucher`](Self::validate_voucher))
    /// - [`LedgerError::RewardExpired`] if the computed reward is zero
    /// - [`LedgerError::NotAuthorized`] if the store refuses this ledger's mark
    /// - [`LedgerError::Transfer`] if the payout fails
    pub fn claim<V, B>(
        &mut self,
        id: &VoucherId,
        vouchers: &mut V,
        bank: &mut B,
    ) -> Result<ClaimReceipt, LedgerError>
    where
        V: VoucherStore + ?Sized,
        B: AssetTransfer + ?Sized,
    {
        let voucher = vouchers.get(id).ok_or(LedgerError::InvalidVoucher(*id))?;
        self.validate_voucher(id, &voucher)?;

        let reward = self.compute_reward(voucher.claimed_quantity)?;
        if reward == 0 {
            return Err(LedgerError::RewardExpired);
        }

        let next = LedgerState {
            distributed_total: self
                .state
                .distributed_total
                .checked_add(reward)
                .ok_or(MathError::ArithmeticOverflow)?,
            remaining_ceiling: self
                .state
                .remaining_ceiling
                .checked_sub(reward)
                .ok_or(MathError::ArithmeticOverflow)?,
            max_discount_rate: self.state.max_discount_rate,
        };
        let next_rate = decayed_rate(
            next.max_discount_rate,
            next.distributed_total,
            self.details.reward_budget,
        )?;
        vouchers.authorize_mark(&self.identity, id)?;

        if let Err(e) = bank.transfer(
            &self.identity,
            &voucher.holder,
            &self.details.reward_asset,
            reward,
        ) {
            warn!(ledger = %self.identity, voucher = %id, error = %e, "ledger: payout failed");
            return Err(e.into());
        }

        self.state = next;
        debug!(
            ledger = %self.identity,
            from = self.details.discount_rate,
            to = next_rate,
            distributed = self.state.distributed_total,
            "ledger: discount rate decayed"
        );
        self.details.discount_rate = next_rate;

        if let Err(e) = vouchers.mark_claimed(&self.identity, id) {
            error!(ledger = %self.identity, voucher = %id, error = %e, "ledger: claim mark refused after payout");
            return Err(e);
        }

        info!(
            ledger = %self.identity,
            voucher = %id,
            holder = %voucher.holder,
            reward,
            remaining_ceiling = self.state.remaining_ceiling,
            "ledger: voucher claimed"
        );

        Ok(ClaimReceipt {
            voucher: *id,
            holder: voucher.holder,
            reward,
            discount_rate_after: next_rate,
        })
    }

    /// Replace the campaign details wholesale.
    ///
    /// `distributed_total` and `remaining_ceiling` are kept. The new
    /// `discount_rate` becomes the decay's starting rate, so later claims
    /// decay from it and never climb back towards an earlier maximum.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthorized`] unless `caller` is the registry
    pub fn update_details(
        &mut self,
        caller: &AccountId,
        details: CampaignDetails,
    ) -> Result<(), LedgerError> {
        if *caller != self.registry {
            warn!(ledger = %self.identity, %caller, "ledger: rejected details update");
            return Err(LedgerError::NotAuthorized(*caller));
        }
        info!(
            ledger = %self.identity,
            budget = details.reward_budget,
            rate = details.discount_rate,
            expiration = details.expiration_time,
            "ledger: details replaced"
        );
        self.state.max_discount_rate = details.discount_rate;
        self.details = details;
        Ok(())
    }

    /// Send `amount` of any asset held by this ledger to its owner.
    ///
    /// Not checked against what outstanding vouchers are owed: the owner
    /// is trusted with the campaign's funds.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthorized`] unless `caller` is the owner
    /// - [`LedgerError::Transfer`] if the transfer fails
    pub fn recover_asset<B>(
        &mut self,
        caller: &AccountId,
        asset: &AssetId,
        amount: Amount,
        bank: &mut B,
    ) -> Result<(), LedgerError>
    where
        B: AssetTransfer + ?Sized,
    {
        if *caller != self.owner {
            warn!(ledger = %self.identity, %caller, "ledger: rejected asset recovery");
            return Err(LedgerError::NotAuthorized(*caller));
        }
        bank.transfer(&self.identity, &self.owner, asset, amount)?;
        info!(ledger = %self.identity, %asset, amount, "ledger: asset recovered by owner");
        Ok(())
    }
}
