//! Shared test helpers for E2E and property tests.

use taper_core::constants::percent;
use taper_core::error::TransferError;
use taper_core::memory::{MemoryBank, MemoryMarkets};
use taper_core::traits::AssetTransfer;
use taper_core::types::*;
use taper_registry::{CampaignRegistry, RegistryConfig};

pub const POOL: MarketKey = MarketKey([0xA0; 32]);
pub const REWARD: AssetId = AssetId([0xB0; 32]);
pub const OTHER_ASSET: AssetId = AssetId([0xB1; 32]);
pub const OWNER: AccountId = AccountId([0xC0; 32]);
pub const ISSUER: AccountId = AccountId([0xC1; 32]);
pub const EXPIRY: Timestamp = 1_700_000_000;

/// Simple account identity from a seed byte.
pub fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

/// Market key from a seed byte.
pub fn market(seed: u8) -> MarketKey {
    MarketKey([seed; 32])
}

/// Install a `tracing` subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Campaign details paying `rate_percent`% of `REWARD` out of `budget`.
pub fn details(budget: Amount, rate_percent: u128) -> CampaignDetails {
    CampaignDetails {
        reward_budget: budget,
        expiration_time: EXPIRY,
        cool_down_period: 0,
        discount_rate: percent(rate_percent),
        reward_asset: REWARD,
    }
}

/// Bank wrapper that can be told to reject transfers.
#[derive(Debug, Default)]
pub struct SwitchableBank {
    pub inner: MemoryBank,
    pub reject: bool,
}

impl AssetTransfer for SwitchableBank {
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.reject {
            return Err(TransferError::Rejected("transfers switched off".into()));
        }
        self.inner.transfer(from, to, asset, amount)
    }

    fn balance_of(&self, holder: &AccountId, asset: &AssetId) -> Amount {
        self.inner.balance_of(holder, asset)
    }
}

pub type TestRegistry = CampaignRegistry<SwitchableBank, MemoryMarkets>;

/// Registry whose own account holds `funding` of `REWARD`, with `ISSUER`
/// as voucher issuer. Markets `POOL` and `market(1..=8)` accept `REWARD`.
pub fn test_registry(funding: Amount) -> TestRegistry {
    init_tracing();
    let config = RegistryConfig {
        voucher_issuer: ISSUER,
        ..RegistryConfig::default()
    };
    let mut bank = SwitchableBank::default();
    bank.inner
        .mint(&config.registry_id, &REWARD, funding)
        .expect("mint funding");
    let mut markets = MemoryMarkets::new();
    markets.insert(POOL, vec![REWARD, OTHER_ASSET]);
    for seed in 1..=8 {
        markets.insert(market(seed), vec![REWARD]);
    }
    CampaignRegistry::new(config, bank, markets)
}

/// Registry with one funded campaign on `POOL`. Returns the ledger identity.
pub fn registry_with_campaign(budget: Amount, rate_percent: u128) -> (TestRegistry, AccountId) {
    let mut reg = test_registry(budget);
    let ledger = reg
        .create_campaign(details(budget, rate_percent), POOL, OWNER, EXPIRY - 1000)
        .expect("create campaign");
    (reg, ledger)
}

/// Issue a voucher from `ISSUER` at `EXPIRY - 10`.
pub fn issue(reg: &mut TestRegistry, ledger: AccountId, holder: AccountId, quantity: Amount) -> VoucherId {
    reg.issue_voucher(&ISSUER, holder, ledger, quantity, EXPIRY - 10)
        .expect("issue voucher")
}
