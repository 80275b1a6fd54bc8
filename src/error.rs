//! Error types for mnemonic account derivation

use thiserror::Error;

use crate::derivation::DerivationError;
use crate::keys::KeyPairError;
use crate::mnemonic::MnemonicError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    KeyPair(#[from] KeyPairError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
