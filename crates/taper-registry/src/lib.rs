//! # taper-registry
//! Campaign registry for Taper.
//!
//! The [`CampaignRegistry`] creates at most one funded [`RewardLedger`] per
//! market, owns the voucher table ([`VoucherBook`]) and relays each ledger's
//! request to mark a voucher claimed, accepting it only from the ledger the
//! voucher was issued against.
//!
//! [`RewardLedger`]: taper_ledger::RewardLedger

pub mod config;
pub mod registry;
pub mod vouchers;

pub use config::RegistryConfig;
pub use registry::CampaignRegistry;
pub use vouchers::VoucherBook;
