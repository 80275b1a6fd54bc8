//! Generator state: the form inputs, the derived accounts and the error line
//!
//! Every failure is folded into a single user-facing message; nothing here
//! returns an error to the caller.

use serde::Serialize;
use zeroize::Zeroizing;

use crate::accounts::{Account, Bip39Backend, DerivedAccounts, WalletBackend};
use crate::config::Config;

pub const DEFAULT_ACCOUNT_COUNT: u32 = 10;

pub const EMPTY_MNEMONIC_MESSAGE: &str = "Please enter a mnemonic phrase";
pub const INVALID_MNEMONIC_MESSAGE: &str = "Invalid mnemonic phrase. Please check your words and try again. Each word should be from the BIP39 word list.";
pub const CREATE_FAILED_PREFIX: &str = "Error generating new mnemonic: ";
pub const GENERATE_FAILED_PREFIX: &str = "Error generating accounts: ";

/// What the presentation layer may show for one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountView<'a> {
    pub path: &'a str,
    pub address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<&'a str>,
}

pub struct GeneratorState<B: WalletBackend = Bip39Backend> {
    backend: B,
    mnemonic: Zeroizing<String>,
    account_count: u32,
    show_private_keys: bool,
    error: Option<String>,
    accounts: Vec<Account>,
    base_xpub: Option<String>,
    generating: bool,
}

impl GeneratorState<Bip39Backend> {
    pub fn new() -> Self {
        Self::with_backend(Bip39Backend::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let backend = Bip39Backend::new(config.word_count, &config.passphrase);
        let mut state = Self::with_backend(backend);
        state.set_account_count(config.account_count);
        state.set_show_private_keys(config.show_private_keys);
        state
    }
}

impl Default for GeneratorState<Bip39Backend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: WalletBackend> GeneratorState<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            mnemonic: Zeroizing::new(String::new()),
            account_count: DEFAULT_ACCOUNT_COUNT,
            show_private_keys: false,
            error: None,
            accounts: Vec::new(),
            base_xpub: None,
            generating: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn set_mnemonic(&mut self, text: &str) {
        self.mnemonic = Zeroizing::new(text.to_string());
    }

    pub fn account_count(&self) -> u32 {
        self.account_count
    }

    pub fn set_account_count(&mut self, count: u32) {
        self.account_count = count.max(1);
    }

    /// Numeric-input semantics: the leading integer of the text, at least 1
    pub fn set_account_count_input(&mut self, text: &str) {
        self.set_account_count(parse_account_count(text));
    }

    pub fn show_private_keys(&self) -> bool {
        self.show_private_keys
    }

    pub fn set_show_private_keys(&mut self, show: bool) {
        self.show_private_keys = show;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Extended public key of the base path, from the last successful generation
    pub fn base_xpub(&self) -> Option<&str> {
        self.base_xpub.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Accounts as they should be displayed, honouring the private key toggle
    pub fn visible_accounts(&self) -> Vec<AccountView<'_>> {
        self.accounts
            .iter()
            .map(|account| AccountView {
                path: &account.path,
                address: &account.address,
                private_key: self
                    .show_private_keys
                    .then(|| account.private_key.as_str()),
            })
            .collect()
    }

    /// Replaces the mnemonic with a fresh one. On failure the old text stays.
    pub fn create_new_mnemonic(&mut self) {
        match self.backend.create_mnemonic() {
            Ok(phrase) => {
                self.mnemonic = Zeroizing::new(phrase);
                self.error = None;
                tracing::info!("Created new mnemonic");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Mnemonic creation failed");
                self.error = Some(format!("{}{}", CREATE_FAILED_PREFIX, e));
            }
        }
    }

    pub fn generate_accounts(&mut self) {
        self.error = None;
        self.accounts.clear();
        self.base_xpub = None;

        let trimmed = Zeroizing::new(self.mnemonic.trim().to_string());
        if trimmed.is_empty() {
            self.error = Some(EMPTY_MNEMONIC_MESSAGE.to_string());
            return;
        }

        if !self.backend.is_valid_mnemonic(&trimmed) {
            tracing::debug!("Rejected invalid mnemonic");
            self.error = Some(INVALID_MNEMONIC_MESSAGE.to_string());
            return;
        }

        self.generating = true;
        tracing::info!(count = self.account_count, "Generating accounts");

        match self.backend.derive_accounts(&trimmed, self.account_count) {
            Ok(DerivedAccounts {
                accounts,
                base_xpub,
            }) => {
                tracing::info!(count = accounts.len(), "Generated accounts");
                self.accounts = accounts;
                self.base_xpub = Some(base_xpub);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Account generation failed");
                self.error = Some(format!("{}{}", GENERATE_FAILED_PREFIX, e));
            }
        }

        self.generating = false;
    }
}

/// Parses the account count the way an HTML number input feeds `parseInt`:
/// leading whitespace and sign are accepted, trailing junk is ignored, and
/// anything that is not a positive integer becomes 1.
pub fn parse_account_count(text: &str) -> u32 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 1;
    }

    // Every digit was checked above, so the only failure left is overflow
    digits.parse::<u32>().unwrap_or(u32::MAX).max(1)
}
