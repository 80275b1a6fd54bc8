//! Derive Ethereum accounts from a BIP39 mnemonic phrase.
//!
//! Accounts live at `m/44'/60'/0'/0/<index>`. Mnemonic handling, BIP32 key
//! derivation and address computation are built on the `bip39`, `bip32`
//! and `alloy-primitives` crates; [`session::GeneratorState`] wraps them in
//! the form state a front end drives.

pub mod accounts;
pub mod config;
pub mod derivation;
pub mod keys;
pub mod mnemonic;
pub mod render;
pub mod session;

mod error;

pub use accounts::{
    derive_accounts, Account, AccountDeriver, Bip39Backend, DerivedAccounts, WalletBackend,
};
pub use config::Config;
pub use derivation::{paths, DerivationError, DerivationPath, XPrv, XPub};
pub use error::{Error, Result};
pub use keys::{KeyPair, KeyPairError};
pub use mnemonic::{
    generate_entropy, is_valid_mnemonic, MnemonicError, MnemonicStrength, SecureMnemonic,
};
pub use session::{AccountView, GeneratorState};
