//! Counter configuration.
//!
//! Loaded from `VEDAA_*` environment variables with development defaults.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vedaa_core::validation::validate_gstin;
use vedaa_core::{ShopDetails, DEFAULT_USER_ID};

/// How invoice numbers are assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceNumbering {
    /// `INV-YYYYMMDD-` plus a random three-digit suffix.
    #[default]
    Random,
    /// Per-day counter kept in the database; never repeats within a day.
    Sequential,
}

/// Counter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Whose settings to load
    pub user_id: String,

    /// Printed in every invoice header
    pub shop: ShopDetails,

    pub invoice_numbering: InvoiceNumbering,

    /// Where printable invoices are written
    pub output_dir: PathBuf,
}

impl CounterConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = ShopDetails::default();

        let shop = ShopDetails {
            name: var("VEDAA_SHOP_NAME").unwrap_or(defaults.name),
            address: var("VEDAA_SHOP_ADDRESS").unwrap_or(defaults.address),
            gstin: var("VEDAA_SHOP_GSTIN").unwrap_or(defaults.gstin),
            phone: var("VEDAA_SHOP_PHONE").unwrap_or(defaults.phone),
        };
        validate_gstin(&shop.gstin).map_err(|_| ConfigError::InvalidValue("VEDAA_SHOP_GSTIN".to_string()))?;

        let invoice_numbering = match var("VEDAA_INVOICE_NUMBERING").as_deref() {
            None | Some("random") => InvoiceNumbering::Random,
            Some("sequential") => InvoiceNumbering::Sequential,
            Some(_) => return Err(ConfigError::InvalidValue("VEDAA_INVOICE_NUMBERING".to_string())),
        };

        Ok(CounterConfig {
            db_path: var("VEDAA_DB_PATH").unwrap_or_else(|| "./vedaa.db".to_string()).into(),
            user_id: var("VEDAA_USER_ID").unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            shop,
            invoice_numbering,
            output_dir: var("VEDAA_OUTPUT_DIR").unwrap_or_else(|| ".".to_string()).into(),
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
