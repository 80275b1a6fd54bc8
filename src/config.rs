//! Configuration for the account generator
//!
//! Values are resolved in order: built-in defaults, an optional JSON file,
//! then environment variables.
//!
//! ```bash
//! export MNEMONIC_ACCOUNT_COUNT=20
//! export MNEMONIC_SHOW_PRIVATE_KEYS=false
//! export MNEMONIC_WORD_COUNT=24
//! export MNEMONIC_PASSPHRASE="optional bip39 passphrase"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::mnemonic::MnemonicStrength;
use crate::session::DEFAULT_ACCOUNT_COUNT;
use crate::{Error, Result};

/// Environment variable names
pub mod env_vars {
    pub const ACCOUNT_COUNT: &str = "MNEMONIC_ACCOUNT_COUNT";
    pub const SHOW_PRIVATE_KEYS: &str = "MNEMONIC_SHOW_PRIVATE_KEYS";
    pub const WORD_COUNT: &str = "MNEMONIC_WORD_COUNT";
    pub const PASSPHRASE: &str = "MNEMONIC_PASSPHRASE";
    /// Read by the binary only, never stored in `Config`
    pub const MNEMONIC: &str = "MNEMONIC";
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accounts to derive when no count is given
    pub account_count: u32,
    /// Reveal private keys in the output by default
    pub show_private_keys: bool,
    /// Words in newly created mnemonics
    pub word_count: MnemonicStrength,
    /// BIP39 passphrase mixed into the seed (empty for the usual wallets)
    #[serde(skip_serializing)]
    pub passphrase: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account_count: DEFAULT_ACCOUNT_COUNT,
            show_private_keys: false,
            word_count: MnemonicStrength::Words12,
            passphrase: String::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("account_count", &self.account_count)
            .field("show_private_keys", &self.show_private_keys)
            .field("word_count", &self.word_count)
            .field("passphrase_set", &!self.passphrase.is_empty())
            .finish()
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overlay environment variables. Unparsable values are logged and skipped.
    pub fn apply_env(mut self) -> Self {
        self.apply_vars(|name| std::env::var(name).ok());
        self
    }

    fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(env_vars::ACCOUNT_COUNT) {
            match value.trim().parse::<u32>() {
                Ok(count) => self.account_count = count,
                Err(e) => tracing::warn!(
                    var = env_vars::ACCOUNT_COUNT,
                    value = %value,
                    error = %e,
                    "Ignoring invalid account count"
                ),
            }
        }

        if let Some(value) = lookup(env_vars::SHOW_PRIVATE_KEYS) {
            match parse_bool(&value) {
                Some(show) => self.show_private_keys = show,
                None => tracing::warn!(
                    var = env_vars::SHOW_PRIVATE_KEYS,
                    value = %value,
                    "Ignoring invalid boolean"
                ),
            }
        }

        if let Some(value) = lookup(env_vars::WORD_COUNT) {
            match value.parse::<MnemonicStrength>() {
                Ok(strength) => self.word_count = strength,
                Err(e) => tracing::warn!(
                    var = env_vars::WORD_COUNT,
                    value = %value,
                    error = %e,
                    "Ignoring invalid word count"
                ),
            }
        }

        if let Some(value) = lookup(env_vars::PASSPHRASE) {
            tracing::debug!("Using BIP39 passphrase from {}", env_vars::PASSPHRASE);
            self.passphrase = value;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.account_count == 0 {
            return Err(Error::Config(
                "account_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
