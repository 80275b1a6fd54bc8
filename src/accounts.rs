//! Ethereum account derivation from a mnemonic phrase
//!
//! All accounts hang off the fixed base path `m/44'/60'/0'/0`; the account
//! index is appended as a non-hardened child.

use std::fmt;
use std::time::Instant;

use zeroize::Zeroizing;

use crate::derivation::{child_path, paths, DerivationError, DerivationPath, HARDENED_BIT};
use crate::keys::KeyPair;
use crate::mnemonic::{self, MnemonicStrength, SecureMnemonic};
use crate::{Error, Result};

/// A derived account. The private key is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub address: String,
    pub private_key: Zeroizing<String>,
    pub path: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .field("path", &self.path)
            .finish()
    }
}

/// Holds the key at the base path so that each account costs a single child step.
pub struct AccountDeriver {
    base: KeyPair,
    base_path: DerivationPath,
}

impl AccountDeriver {
    pub fn from_phrase(phrase: &str, passphrase: &str) -> Result<Self> {
        let mnemonic = SecureMnemonic::from_phrase(phrase)?;
        Self::from_mnemonic(&mnemonic, passphrase)
    }

    pub fn from_mnemonic(mnemonic: &SecureMnemonic, passphrase: &str) -> Result<Self> {
        let seed = mnemonic.to_seed(passphrase);
        let root = KeyPair::from_seed(&seed[..])?;
        let base_path = paths::ethereum_base()?;
        let base = root.derive(&base_path)?;

        Ok(Self { base, base_path })
    }

    pub fn account(&self, index: u32) -> Result<Account> {
        let path = child_path(&self.base_path, index)?;
        let child = self.base.derive_child(index)?;

        Ok(Account {
            address: child.eth_address(),
            private_key: child.private_key_hex(),
            path: path.to_string(),
        })
    }

    /// Accounts `0..count`, in index order
    pub fn derive(&self, count: u32) -> Result<Vec<Account>> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "account count must be at least 1".to_string(),
            ));
        }
        if count > HARDENED_BIT {
            return Err(DerivationError::InvalidChildNumber.into());
        }

        let started = Instant::now();
        let accounts = (0..count)
            .map(|index| self.account(index))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Derived accounts"
        );
        Ok(accounts)
    }

    /// Extended public key of the base node, enough to watch every account
    pub fn base_xpub(&self) -> String {
        self.base.xpub()
    }
}

/// The wallet capabilities the generator relies on
pub trait WalletBackend {
    /// Produce a fresh random mnemonic phrase
    fn create_mnemonic(&self) -> Result<String>;

    /// Wordlist and checksum check. Must not fail, only answer.
    fn is_valid_mnemonic(&self, phrase: &str) -> bool;

    /// Derive accounts `0..count` under the base path, along with the
    /// base xpub from the same derivation
    fn derive_accounts(&self, phrase: &str, count: u32) -> Result<DerivedAccounts>;
}

/// Output of one derivation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAccounts {
    pub accounts: Vec<Account>,
    /// Extended public key of `m/44'/60'/0'/0`
    pub base_xpub: String,
}

/// Backend built on the `bip39`, `bip32` and `alloy-primitives` crates
#[derive(Clone, Default)]
pub struct Bip39Backend {
    strength: MnemonicStrength,
    passphrase: Zeroizing<String>,
}

impl Bip39Backend {
    pub fn new(strength: MnemonicStrength, passphrase: &str) -> Self {
        Self {
            strength,
            passphrase: Zeroizing::new(passphrase.to_string()),
        }
    }

    pub fn strength(&self) -> MnemonicStrength {
        self.strength
    }
}

impl WalletBackend for Bip39Backend {
    fn create_mnemonic(&self) -> Result<String> {
        let mnemonic = SecureMnemonic::generate(self.strength)?;
        tracing::debug!(words = self.strength.word_count(), "Created new mnemonic");
        Ok(mnemonic.phrase())
    }

    fn is_valid_mnemonic(&self, phrase: &str) -> bool {
        mnemonic::is_valid_mnemonic(phrase)
    }

    fn derive_accounts(&self, phrase: &str, count: u32) -> Result<DerivedAccounts> {
        let deriver = AccountDeriver::from_phrase(phrase, &self.passphrase)?;
        Ok(DerivedAccounts {
            accounts: deriver.derive(count)?,
            base_xpub: deriver.base_xpub(),
        })
    }
}

/// Derive `count` accounts with an empty BIP39 passphrase
pub fn derive_accounts(phrase: &str, count: u32) -> Result<Vec<Account>> {
    AccountDeriver::from_phrase(phrase, "")?.derive(count)
}
