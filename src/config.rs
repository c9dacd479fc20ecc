//! Cart configuration

use crate::Result;
use serde::{Deserialize, Serialize};
use std::{env, fmt::Display, path::PathBuf, str::FromStr};

/// Storage key the cart snapshot lives under
pub const DEFAULT_CART_KEY: &str = "foodhub_cart";

/// Flat delivery fee added at checkout
pub const DEFAULT_DELIVERY_FEE: f64 = 40.0;

/// Directory used by file-backed storage when none is configured
pub const DEFAULT_STORAGE_DIR: &str = ".foodhub";

/// Settings shared by the cart and checkout
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CartConfig {
    /// Storage key of the cart snapshot
    pub storage_key: String,
    /// Directory for file-backed storage
    pub storage_dir: PathBuf,
    /// Flat delivery fee
    pub delivery_fee: f64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_CART_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            delivery_fee: DEFAULT_DELIVERY_FEE,
        }
    }
}

impl CartConfig {
    /// Loads settings from `FOODHUB_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            storage_key: try_load("FOODHUB_CART_KEY", defaults.storage_key),
            storage_dir: env::var_os("FOODHUB_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            delivery_fee: try_load("FOODHUB_DELIVERY_FEE", defaults.delivery_fee),
        }
    }

    /// Parses settings from JSON; absent fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        log::debug!("{key} not set, using default: {default}");
        return default;
    };

    raw.parse().unwrap_or_else(|e| {
        log::warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CartConfig::default();

        assert_eq!(config.storage_key, "foodhub_cart");
        assert_eq!(config.delivery_fee, 40.0);
        assert_eq!(config.storage_dir, PathBuf::from(".foodhub"));
    }

    #[test]
    fn test_from_json_fills_missing_fields() {
        let config = CartConfig::from_json_str(r#"{ "delivery_fee": 25.5 }"#).unwrap();

        assert_eq!(config.delivery_fee, 25.5);
        assert_eq!(config.storage_key, DEFAULT_CART_KEY);
        assert!(CartConfig::from_json_str("[").is_err());
    }

    #[test]
    fn test_try_load_falls_back_on_bad_value() {
        env::set_var("FOODHUB_TEST_FEE", "lots");
        assert_eq!(try_load("FOODHUB_TEST_FEE", 40.0), 40.0);

        env::set_var("FOODHUB_TEST_FEE", "55");
        assert_eq!(try_load("FOODHUB_TEST_FEE", 40.0), 55.0);

        env::remove_var("FOODHUB_TEST_FEE");
        assert_eq!(try_load("FOODHUB_TEST_FEE", 40.0), 40.0);
    }
}
