//! BIP32/BIP44 derivation paths and extended keys
//!
//! Key derivation itself is done by the `bip32` crate; this module only
//! builds the paths and maps its errors.

use std::str::FromStr;
use thiserror::Error;

pub use bip32::{ChildNumber, DerivationPath, Prefix, XPrv, XPub};

pub const HARDENED_BIT: u32 = 0x80000000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Invalid derivation path '{0}'")]
    InvalidPath(String),

    #[error("Invalid child number")]
    InvalidChildNumber,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),
}

impl From<bip32::Error> for DerivationError {
    fn from(err: bip32::Error) -> Self {
        DerivationError::KeyDerivationFailed(err.to_string())
    }
}

pub fn parse_path(path: &str) -> Result<DerivationPath, DerivationError> {
    DerivationPath::from_str(path).map_err(|_| DerivationError::InvalidPath(path.to_string()))
}

/// Non-hardened child number; indices from 2^31 up are rejected
pub fn normal_child(index: u32) -> Result<ChildNumber, DerivationError> {
    if index & HARDENED_BIT != 0 {
        return Err(DerivationError::InvalidChildNumber);
    }
    ChildNumber::new(index, false).map_err(|_| DerivationError::InvalidChildNumber)
}

/// `path` with a non-hardened `index` appended
pub fn child_path(path: &DerivationPath, index: u32) -> Result<DerivationPath, DerivationError> {
    let mut child = path.clone();
    child.push(normal_child(index)?);
    Ok(child)
}

/// Walks `path` down from `root`
pub fn derive(root: &XPrv, path: &DerivationPath) -> Result<XPrv, DerivationError> {
    let mut key = root.clone();
    for child_number in path.iter() {
        key = key.derive_child(child_number)?;
    }
    Ok(key)
}

/// Utility functions for common derivation paths
pub mod paths {
    use super::{child_path, normal_child, ChildNumber, DerivationError, DerivationPath};

    /// Ethereum - Coin type 60
    pub const ETHEREUM: u32 = 60;

    /// Base path every generated account hangs off
    pub const ETHEREUM_BASE: &str = "m/44'/60'/0'/0";

    /// BIP44 - Multi-Account Hierarchy for Deterministic Wallets
    /// Format: m/44'/coin_type'/account'/change/address_index
    pub fn bip44(
        coin_type: u32,
        account: u32,
        change: bool,
        address_index: u32,
    ) -> Result<DerivationPath, DerivationError> {
        child_path(&bip44_chain(coin_type, account, change)?, address_index)
    }

    /// The external or internal chain of a BIP44 account, without the address index
    pub fn bip44_chain(
        coin_type: u32,
        account: u32,
        change: bool,
    ) -> Result<DerivationPath, DerivationError> {
        let mut path = DerivationPath::default();
        for index in [44, coin_type, account] {
            let hardened =
                ChildNumber::new(index, true).map_err(|_| DerivationError::InvalidChildNumber)?;
            path.push(hardened);
        }
        path.push(normal_child(u32::from(change))?);
        Ok(path)
    }

    pub fn ethereum_base() -> Result<DerivationPath, DerivationError> {
        bip44_chain(ETHEREUM, 0, false)
    }

    pub fn ethereum_account(index: u32) -> Result<DerivationPath, DerivationError> {
        child_path(&ethereum_base()?, index)
    }
}
