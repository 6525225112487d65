//! Registry configuration.
//!
//! Provides [`RegistryConfig`] with defaults for the registry's identity,
//! the authorized voucher issuer and the discount-rate cap. The configuration
//! can be built programmatically or loaded from JSON.

use serde::{Deserialize, Serialize};

use taper_core::constants::MAX_DISCOUNT_RATE;
use taper_core::error::ConfigError;
use taper_core::types::{derive_id, AccountId, Rate};

const REGISTRY_ID_DOMAIN: &[u8] = b"taper/registry/v1";

/// Configuration for a campaign registry instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Identity of the registry. Also the account campaign funding is drawn from.
    pub registry_id: AccountId,
    /// The only caller allowed to write voucher records.
    pub voucher_issuer: AccountId,
    /// Highest discount rate a campaign may be created or updated with.
    pub max_discount_rate: Rate,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let registry_id = AccountId(derive_id(REGISTRY_ID_DOMAIN, &AccountId::ZERO, 0));
        Self {
            registry_id,
            voucher_issuer: registry_id,
            max_discount_rate: MAX_DISCOUNT_RATE,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_discount_rate == 0 || self.max_discount_rate > MAX_DISCOUNT_RATE {
            return Err(ConfigError::InvalidMaxDiscountRate {
                got: self.max_discount_rate,
                max: MAX_DISCOUNT_RATE,
            });
        }
        Ok(())
    }
}
