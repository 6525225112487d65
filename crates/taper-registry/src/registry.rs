//! The campaign registry (factory).
//!
//! [`CampaignRegistry`] creates and funds one [`RewardLedger`] per market,
//! keeps the market → campaign records and the voucher table, and routes
//! claims to the ledger they name. The asset-transfer and market-directory
//! collaborators are supplied by the host.
//!
//! Operations either commit completely or return an error with no state
//! changed. The funding transfer is the last fallible step of
//! [`create_campaign`](CampaignRegistry::create_campaign), so a campaign
//! record never exists without a funded ledger.

use std::collections::HashMap;

use tracing::{info, warn};

use taper_core::constants::LEDGER_ID_DOMAIN;
use taper_core::error::RegistryError;
use taper_core::traits::{AssetTransfer, MarketDirectory, VoucherStore};
use taper_core::types::{
    derive_id, AccountId, Amount, AssetId, CampaignDetails, CampaignRecord, MarketKey, Timestamp,
    VoucherId, VoucherRecord,
};
use taper_ledger::{ClaimReceipt, RewardLedger};

use crate::config::RegistryConfig;
use crate::vouchers::VoucherBook;

/// Factory and voucher authority for reward campaigns.
pub struct CampaignRegistry<B, M> {
    config: RegistryConfig,
    bank: B,
    markets: M,
    /// Market → campaign. Records are never removed or re-pointed.
    campaigns: HashMap<MarketKey, CampaignRecord>,
    /// Ledger identity → ledger.
    ledgers: HashMap<AccountId, RewardLedger>,
    vouchers: VoucherBook,
    next_ledger_nonce: u64,
}

impl<B, M> CampaignRegistry<B, M>
where
    B: AssetTransfer,
    M: MarketDirectory,
{
    /// Create an empty registry.
    pub fn new(config: RegistryConfig, bank: B, markets: M) -> Self {
        let vouchers = VoucherBook::new(config.registry_id);
        Self {
            config,
            bank,
            markets,
            campaigns: HashMap::new(),
            ledgers: HashMap::new(),
            vouchers,
            next_ledger_nonce: 0,
        }
    }

    /// Identity of the registry; campaign funding is drawn from this account.
    pub fn identity(&self) -> &AccountId {
        &self.config.registry_id
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut B {
        &mut self.bank
    }

    pub fn markets(&self) -> &M {
        &self.markets
    }

    /// Campaign record for `market`, if one was created.
    pub fn campaign(&self, market: &MarketKey) -> Option<&CampaignRecord> {
        self.campaigns.get(market)
    }

    /// Iterate over all campaign records.
    pub fn campaigns(&self) -> impl Iterator<Item = (&MarketKey, &CampaignRecord)> {
        self.campaigns.iter()
    }

    /// Ledger with identity `ledger`.
    pub fn ledger(&self, ledger: &AccountId) -> Option<&RewardLedger> {
        self.ledgers.get(ledger)
    }

    /// Voucher record `id`.
    pub fn voucher(&self, id: &VoucherId) -> Option<&VoucherRecord> {
        self.vouchers.record(id)
    }

    pub fn vouchers(&self) -> &VoucherBook {
        &self.vouchers
    }

    /// Create and fund the campaign for `market`.
    ///
    /// Transfers exactly `details.reward_budget` of `details.reward_asset`
    /// from the registry's own balance to the new ledger. A ledger is funded
    /// once; nothing here ever tops it up.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::CampaignAlreadyExists`] if `market` already has a campaign
    /// - [`RegistryError::InvalidRewardAsset`] if the market does not accept the asset
    /// - [`RegistryError::InvalidDiscountRate`] if the rate exceeds the configured cap
    /// - [`RegistryError::InsufficientFunding`] if the registry holds less than the budget
    /// - [`RegistryError::Transfer`] if the funding transfer fails
    pub fn create_campaign(
        &mut self,
        details: CampaignDetails,
        market: MarketKey,
        owner: AccountId,
        now: Timestamp,
    ) -> Result<AccountId, RegistryError> {
        if self.campaigns.contains_key(&market) {
            return Err(RegistryError::CampaignAlreadyExists(market));
        }
        if !self.markets.accepts(&market, &details.reward_asset) {
            return Err(RegistryError::InvalidRewardAsset {
                market,
                asset: details.reward_asset,
            });
        }
        self.check_rate(&details)?;

        let registry_id = self.config.registry_id;
        let have = self.bank.balance_of(&registry_id, &details.reward_asset);
        if have < details.reward_budget {
            warn!(%market, have, need = details.reward_budget, "registry: insufficient funding");
            return Err(RegistryError::InsufficientFunding {
                have,
                need: details.reward_budget,
            });
        }

        let ledger_id = AccountId(derive_id(LEDGER_ID_DOMAIN, &registry_id, self.next_ledger_nonce));
        let record = CampaignRecord {
            ledger: ledger_id,
            reward_asset: details.reward_asset,
            creator: owner,
            creation_time: now,
            expiration_time: details.expiration_time,
        };
        let budget = details.reward_budget;
        let ledger = RewardLedger::new(ledger_id, registry_id, owner, details);

        self.bank
            .transfer(&registry_id, &ledger_id, &record.reward_asset, budget)?;

        self.next_ledger_nonce += 1;
        info!(
            %market,
            ledger = %ledger_id,
            %owner,
            asset = %record.reward_asset,
            budget,
            rate = ledger.details().discount_rate,
            expiration = record.expiration_time,
            "registry: campaign created"
        );
        self.ledgers.insert(ledger_id, ledger);
        self.campaigns.insert(market, record);
        Ok(ledger_id)
    }

    /// Replace the details of `market`'s campaign.
    ///
    /// Only the campaign's creator may update it. The ledger was funded once
    /// in its reward asset, so the asset and the budget must stay as they
    /// are; expiration, cool-down and discount rate may change. The new rate
    /// restarts the decay (see [`RewardLedger::update_details`]) and the
    /// record's expiration follows. No funds move.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownCampaign`] if `market` has no campaign
    /// - [`RegistryError::NotAuthorized`] unless `caller` is the creator
    /// - [`RegistryError::FundingTermsChanged`] if the reward asset or budget differs
    /// - [`RegistryError::InvalidDiscountRate`] if the rate exceeds the configured cap
    pub fn update_campaign(
        &mut self,
        caller: &AccountId,
        market: &MarketKey,
        details: CampaignDetails,
    ) -> Result<(), RegistryError> {
        let record = self
            .campaigns
            .get(market)
            .ok_or(RegistryError::UnknownCampaign(*market))?;
        if *caller != record.creator {
            warn!(%market, %caller, "registry: rejected campaign update");
            return Err(RegistryError::NotAuthorized(*caller));
        }
        let ledger_id = record.ledger;

        let current = self
            .ledgers
            .get(&ledger_id)
            .ok_or(RegistryError::UnknownLedger(ledger_id))?
            .details();
        if details.reward_asset != current.reward_asset
            || details.reward_budget != current.reward_budget
        {
            warn!(%market, asset = %details.reward_asset, budget = details.reward_budget, "registry: rejected change of funding terms");
            return Err(RegistryError::FundingTermsChanged(*market));
        }
        self.check_rate(&details)?;

        let ledger = self
            .ledgers
            .get_mut(&ledger_id)
            .ok_or(RegistryError::UnknownLedger(ledger_id))?;
        let expiration_time = details.expiration_time;
        ledger.update_details(&self.config.registry_id, details)?;

        if let Some(record) = self.campaigns.get_mut(market) {
            record.expiration_time = expiration_time;
        }
        info!(%market, ledger = %ledger_id, "registry: campaign updated");
        Ok(())
    }

    /// Write a voucher on behalf of the voucher issuer.
    ///
    /// The registry does not decide when vouchers are issued and does not
    /// check the ledger reference; a voucher naming an unknown ledger simply
    /// can never be claimed.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotAuthorized`] unless `caller` is the configured issuer
    pub fn issue_voucher(
        &mut self,
        caller: &AccountId,
        holder: AccountId,
        ledger: AccountId,
        claimed_quantity: Amount,
        issuance_time: Timestamp,
    ) -> Result<VoucherId, RegistryError> {
        if *caller != self.config.voucher_issuer {
            warn!(%caller, "registry: rejected voucher issuance");
            return Err(RegistryError::NotAuthorized(*caller));
        }
        Ok(self.vouchers.insert(VoucherRecord {
            holder,
            ledger,
            claimed_quantity,
            issuance_time,
            claimed: false,
        }))
    }

    /// Mark voucher `id` claimed.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotAuthorized`] unless `caller` is exactly the
    ///   ledger recorded on the voucher
    pub fn mark_claimed(&mut self, caller: &AccountId, id: &VoucherId) -> Result<(), RegistryError> {
        Ok(self.vouchers.mark_claimed(caller, id)?)
    }

    /// Redeem voucher `id` against `ledger`. See [`RewardLedger::claim`].
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnknownLedger`] if no such ledger exists
    /// - [`RegistryError::Ledger`] for any claim failure
    pub fn claim(&mut self, ledger: &AccountId, id: &VoucherId) -> Result<ClaimReceipt, RegistryError> {
        let target = self
            .ledgers
            .get_mut(ledger)
            .ok_or(RegistryError::UnknownLedger(*ledger))?;
        Ok(target.claim(id, &mut self.vouchers, &mut self.bank)?)
    }

    /// Reward `ledger` would pay right now for `claimed_quantity`.
    pub fn compute_reward(&self, ledger: &AccountId, claimed_quantity: Amount) -> Result<Amount, RegistryError> {
        let target = self
            .ledgers
            .get(ledger)
            .ok_or(RegistryError::UnknownLedger(*ledger))?;
        Ok(target.compute_reward(claimed_quantity)?)
    }

    /// Owner escape hatch. See [`RewardLedger::recover_asset`].
    pub fn recover_asset(
        &mut self,
        ledger: &AccountId,
        caller: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), RegistryError> {
        let target = self
            .ledgers
            .get_mut(ledger)
            .ok_or(RegistryError::UnknownLedger(*ledger))?;
        Ok(target.recover_asset(caller, asset, amount, &mut self.bank)?)
    }

    fn check_rate(&self, details: &CampaignDetails) -> Result<(), RegistryError> {
        let max = self.config.max_discount_rate;
        if details.discount_rate > max {
            return Err(RegistryError::InvalidDiscountRate {
                rate: details.discount_rate,
                max,
            });
        }
        Ok(())
    }
}
