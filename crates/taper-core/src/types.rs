//! Core protocol types: identifiers, campaign parameters and the entity
//! records persisted per campaign, per market and per voucher.
//!
//! All quantities are `u128`. Rates are fixed-point percentages (see
//! [`crate::constants`]). Timestamps are Unix seconds.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::IdParseError;

/// A quantity of some asset, in its smallest unit.
pub type Amount = u128;

/// A fixed-point percentage scaled by [`FIXED_POINT_BASE`](crate::constants::FIXED_POINT_BASE).
pub type Rate = u128;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// The all-zero identifier. Never assigned to a live entity.
            pub const ZERO: Self = Self([0u8; 32]);

            /// Create an identifier from raw bytes.
            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Return the underlying bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Check if this is the zero identifier.
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s, &mut bytes)
                    .map_err(|e| IdParseError(e.to_string()))?;
                Ok(Self(bytes))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

id_type!(
    /// Identity of anything that can hold assets or call an entry point:
    /// holders, campaign owners, the registry and every reward ledger.
    AccountId
);

id_type!(
    /// Identifier of a fungible asset.
    AssetId
);

id_type!(
    /// Identifier of a market (pool). At most one campaign exists per key.
    MarketKey
);

id_type!(
    /// Unique identifier of a claim voucher.
    VoucherId
);

/// Derive a 32-byte identifier from a domain tag, the issuing authority and a nonce.
pub fn derive_id(domain: &[u8], authority: &AccountId, nonce: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(domain);
    hasher.update(authority.as_bytes());
    hasher.update(&nonce.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Parameters of one campaign, owned by its reward ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CampaignDetails {
    /// Total quantity the campaign may ever pay out.
    pub reward_budget: Amount,
    /// Vouchers issued after this instant are not honored.
    pub expiration_time: Timestamp,
    /// Reserved. Not enforced by any transition.
    pub cool_down_period: u64,
    /// Current discount percentage, scaled by `FIXED_POINT_BASE`.
    pub discount_rate: Rate,
    /// Asset the campaign pays out in.
    pub reward_asset: AssetId,
}

/// Registry-side record of a campaign, keyed by market.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CampaignRecord {
    /// Identity (and funding account) of the campaign's reward ledger.
    pub ledger: AccountId,
    pub reward_asset: AssetId,
    /// Owner supplied at creation. Holds the ledger's admin rights.
    pub creator: AccountId,
    pub creation_time: Timestamp,
    pub expiration_time: Timestamp,
}

/// A single-use claim ticket written by the voucher issuer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VoucherRecord {
    pub holder: AccountId,
    /// The only ledger this voucher is redeemable against.
    pub ledger: AccountId,
    /// Quantity the holder transacted. The reward is computed from it.
    pub claimed_quantity: Amount,
    pub issuance_time: Timestamp,
    /// Write-once `false -> true`.
    pub claimed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase_hex() {
        let id = AccountId([0xAB; 32]);
        assert_eq!(id.to_string(), "ab".repeat(32));
    }

    #[test]
    fn parse_display_output() {
        let id = MarketKey([0x1F; 32]);
        let parsed: MarketKey = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_rejects_short_input() {
        assert!("abcd".parse::<AssetId>().is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!("zz".repeat(32).parse::<VoucherId>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let id = AssetId([0x0C; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", "0c".repeat(32)));
        assert_eq!(serde_json::from_str::<AssetId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<AssetId>("\"0c\"").is_err());
    }

    #[test]
    fn zero_identifier() {
        assert!(AccountId::ZERO.is_zero());
        assert!(!AccountId([1; 32]).is_zero());
    }

    #[test]
    fn derive_id_depends_on_every_input() {
        let a = AccountId([1; 32]);
        let b = AccountId([2; 32]);
        let base = derive_id(b"d", &a, 0);
        assert_ne!(base, derive_id(b"e", &a, 0));
        assert_ne!(base, derive_id(b"d", &b, 0));
        assert_ne!(base, derive_id(b"d", &a, 1));
        assert_eq!(base, derive_id(b"d", &a, 0));
    }
}
