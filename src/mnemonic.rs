use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum MnemonicStrength {
    #[default]
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl MnemonicStrength {
    fn to_entropy_bits(self) -> usize {
        match self {
            MnemonicStrength::Words12 => 128,
            MnemonicStrength::Words15 => 160,
            MnemonicStrength::Words18 => 192,
            MnemonicStrength::Words21 => 224,
            MnemonicStrength::Words24 => 256,
        }
    }

    pub fn word_count(self) -> usize {
        match self {
            MnemonicStrength::Words12 => 12,
            MnemonicStrength::Words15 => 15,
            MnemonicStrength::Words18 => 18,
            MnemonicStrength::Words21 => 21,
            MnemonicStrength::Words24 => 24,
        }
    }

    pub fn from_word_count(words: usize) -> Result<Self, MnemonicError> {
        match words {
            12 => Ok(MnemonicStrength::Words12),
            15 => Ok(MnemonicStrength::Words15),
            18 => Ok(MnemonicStrength::Words18),
            21 => Ok(MnemonicStrength::Words21),
            24 => Ok(MnemonicStrength::Words24),
            other => Err(MnemonicError::UnsupportedWordCount(other)),
        }
    }
}

impl TryFrom<usize> for MnemonicStrength {
    type Error = MnemonicError;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        Self::from_word_count(words)
    }
}

impl From<MnemonicStrength> for usize {
    fn from(strength: MnemonicStrength) -> Self {
        strength.word_count()
    }
}

impl FromStr for MnemonicStrength {
    type Err = MnemonicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words = s
            .trim()
            .parse::<usize>()
            .map_err(|_| MnemonicError::UnsupportedWordCount(0))?;
        Self::from_word_count(words)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid mnemonic phrase")]
    InvalidMnemonic,

    #[error("Failed to generate entropy")]
    EntropyGenerationFailed,

    #[error("Unsupported word count {0}, expected 12, 15, 18, 21 or 24")]
    UnsupportedWordCount(usize),
}

/// A parsed BIP39 mnemonic. The phrase never shows up in `Debug` output.
pub struct SecureMnemonic {
    mnemonic: Mnemonic,
}

impl SecureMnemonic {
    pub fn generate(strength: MnemonicStrength) -> Result<Self, MnemonicError> {
        let entropy_bytes = strength.to_entropy_bits() / 8;

        let mut entropy = generate_entropy(entropy_bytes)?;
        let result = Mnemonic::from_entropy(&entropy)
            .map(|mnemonic| Self { mnemonic })
            .map_err(|_| MnemonicError::EntropyGenerationFailed);
        entropy.zeroize();

        result
    }

    /// Parses free text. Leading, trailing and repeated whitespace is ignored,
    /// and words are matched against the word list case-insensitively.
    pub fn from_phrase(phrase: &str) -> Result<Self, MnemonicError> {
        let normalized = Zeroizing::new(normalize_phrase(phrase));
        if normalized.is_empty() {
            return Err(MnemonicError::InvalidMnemonic);
        }

        match Mnemonic::parse_normalized(&normalized) {
            Ok(mnemonic) => Ok(Self { mnemonic }),
            Err(_) => Err(MnemonicError::InvalidMnemonic),
        }
    }

    pub fn phrase(&self) -> String {
        let mut result = String::new();
        for (i, word) in self.mnemonic.word_iter().enumerate() {
            if i > 0 {
                result.push(' ');
            }
            result.push_str(word);
        }
        result
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.word_iter().count()
    }

    pub fn to_seed(&self, passphrase: &str) -> Zeroizing<[u8; 64]> {
        Zeroizing::new(self.mnemonic.to_seed(passphrase))
    }
}

impl fmt::Debug for SecureMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureMnemonic")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// Checks a phrase against the wordlist and checksum. Never fails loudly:
/// anything that does not parse is simply invalid.
pub fn is_valid_mnemonic(phrase: &str) -> bool {
    SecureMnemonic::from_phrase(phrase.trim()).is_ok()
}

pub fn generate_entropy(byte_length: usize) -> Result<Vec<u8>, MnemonicError> {
    let mut bytes = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| MnemonicError::EntropyGenerationFailed)?;
    Ok(bytes)
}

// The word list is all lowercase
fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn generated_mnemonic_is_valid() {
        for strength in [
            MnemonicStrength::Words12,
            MnemonicStrength::Words15,
            MnemonicStrength::Words18,
            MnemonicStrength::Words21,
            MnemonicStrength::Words24,
        ] {
            let mnemonic = SecureMnemonic::generate(strength).unwrap();
            assert_eq!(mnemonic.word_count(), strength.word_count());
            assert!(is_valid_mnemonic(&mnemonic.phrase()));
        }
    }

    #[test]
    fn generated_mnemonics_differ() {
        let a = SecureMnemonic::generate(MnemonicStrength::Words12).unwrap();
        let b = SecureMnemonic::generate(MnemonicStrength::Words12).unwrap();
        assert_ne!(a.phrase(), b.phrase());
    }

    #[test]
    fn whitespace_is_collapsed() {
        let messy = "  test test\ttest test test test\n test test test test test   junk \n";
        let mnemonic = SecureMnemonic::from_phrase(messy).unwrap();
        assert_eq!(mnemonic.phrase(), HARDHAT_PHRASE);
        assert!(is_valid_mnemonic(messy));
    }

    #[test]
    fn case_is_folded() {
        let shouted = "TEST test test test test test test test test test test Junk";
        assert!(is_valid_mnemonic(shouted));
        let mnemonic = SecureMnemonic::from_phrase(shouted).unwrap();
        assert_eq!(mnemonic.phrase(), HARDHAT_PHRASE);
        assert_eq!(
            mnemonic.to_seed("")[..],
            SecureMnemonic::from_phrase(HARDHAT_PHRASE).unwrap().to_seed("")[..]
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(!is_valid_mnemonic(""));
        assert!(!is_valid_mnemonic("   \n\t "));
        assert!(!is_valid_mnemonic("hello world"));
        // right words, wrong checksum
        assert!(!is_valid_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon"
        ));
        assert!(!is_valid_mnemonic(
            "test test test test test test test test test test test notaword"
        ));
        assert_eq!(
            SecureMnemonic::from_phrase("").unwrap_err(),
            MnemonicError::InvalidMnemonic
        );
    }

    #[test]
    fn seed_depends_on_passphrase() {
        let mnemonic = SecureMnemonic::from_phrase(HARDHAT_PHRASE).unwrap();
        let plain = mnemonic.to_seed("");
        let salted = mnemonic.to_seed("TREZOR");
        assert_ne!(plain[..], salted[..]);
        assert_eq!(plain[..], mnemonic.to_seed("")[..]);
    }

    #[test]
    fn debug_hides_phrase() {
        let mnemonic = SecureMnemonic::from_phrase(HARDHAT_PHRASE).unwrap();
        let printed = format!("{:?}", mnemonic);
        assert!(!printed.contains("junk"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn strength_from_word_count() {
        assert_eq!("24".parse::<MnemonicStrength>().unwrap(), MnemonicStrength::Words24);
        assert_eq!(
            MnemonicStrength::from_word_count(13).unwrap_err(),
            MnemonicError::UnsupportedWordCount(13)
        );
        assert!("twelve".parse::<MnemonicStrength>().is_err());
    }
}
