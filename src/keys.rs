use crate::derivation::{self, normal_child, DerivationError, DerivationPath, Prefix, XPrv};
use alloy_primitives::{keccak256, Address};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyPairError {
    #[error("Derivation error: {0}")]
    DerivationError(#[from] DerivationError),

    #[error("Invalid seed")]
    InvalidSeed,
}

#[derive(Clone)]
pub struct KeyPair {
    xprv: XPrv,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("depth", &self.depth())
            .field("fingerprint", &self.fingerprint())
            .field("xprv", &"[REDACTED]")
            .finish()
    }
}

impl KeyPair {
    /// Create a new key pair from a seed
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyPairError> {
        let xprv = XPrv::new(seed).map_err(|_| KeyPairError::InvalidSeed)?;

        Ok(KeyPair { xprv })
    }

    /// Derive a descendant key pair using a string path
    pub fn derive_path(&self, path: &str) -> Result<Self, KeyPairError> {
        let derivation_path = derivation::parse_path(path)?;
        self.derive(&derivation_path)
    }

    pub fn derive(&self, path: &DerivationPath) -> Result<Self, KeyPairError> {
        let xprv = derivation::derive(&self.xprv, path)?;

        Ok(KeyPair { xprv })
    }

    /// Non-hardened child step
    pub fn derive_child(&self, index: u32) -> Result<Self, KeyPairError> {
        let xprv = self
            .xprv
            .derive_child(normal_child(index)?)
            .map_err(DerivationError::from)?;

        Ok(KeyPair { xprv })
    }

    pub fn depth(&self) -> u8 {
        self.xprv.attrs().depth
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        self.xprv.public_key().fingerprint()
    }

    /// `0x`-prefixed lowercase hex of the secret key
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        let bytes: Zeroizing<[u8; 32]> = Zeroizing::new(self.xprv.private_key().to_bytes().into());
        let mut out = Zeroizing::new(String::with_capacity(66));
        out.push_str("0x");
        out.push_str(&Zeroizing::new(hex::encode(&bytes[..])));
        out
    }

    pub fn address(&self) -> Address {
        let public_key = k256::PublicKey::from(self.xprv.private_key().verifying_key());
        let encoded = public_key.to_encoded_point(false);

        // Drop the 0x04 prefix, keep the last 20 bytes of the hash
        let hash = keccak256(&encoded.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    /// EIP-55 checksummed address
    pub fn eth_address(&self) -> String {
        self.address().to_checksum(None)
    }

    /// Serialize extended private key (xprv)
    pub fn xprv(&self) -> Zeroizing<String> {
        self.xprv.to_string(Prefix::XPRV)
    }

    /// Serialize extended public key (xpub)
    pub fn xpub(&self) -> String {
        self.xprv.public_key().to_string(Prefix::XPUB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::XPub;
    use crate::mnemonic::SecureMnemonic;

    const HARDHAT_PHRASE: &str = "test test test test test test test test test test test junk";

    fn hardhat_root() -> KeyPair {
        let mnemonic = SecureMnemonic::from_phrase(HARDHAT_PHRASE).unwrap();
        KeyPair::from_seed(&mnemonic.to_seed("")[..]).unwrap()
    }

    fn bip32_vector_master() -> KeyPair {
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        KeyPair::from_seed(&seed).unwrap()
    }

    #[test]
    fn derives_hardhat_account_zero() {
        let account = hardhat_root().derive_path("m/44'/60'/0'/0/0").unwrap();
        assert_eq!(
            account.eth_address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(
            account.private_key_hex().as_str(),
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
        assert_eq!(account.depth(), 5);
    }

    #[test]
    fn child_of_base_matches_full_path() {
        let root = hardhat_root();
        let base = root.derive_path("m/44'/60'/0'/0").unwrap();
        let via_child = base.derive_child(1).unwrap();
        let via_path = root.derive_path("m/44'/60'/0'/0/1").unwrap();

        assert_eq!(via_child.eth_address(), via_path.eth_address());
        assert_eq!(
            via_child.eth_address(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
    }

    #[test]
    fn extended_key_serialization() {
        let base = hardhat_root().derive_path("m/44'/60'/0'/0").unwrap();
        let xpub = base.xpub();
        let xprv = base.xprv();
        assert!(xpub.starts_with("xpub"));
        assert!(xprv.starts_with("xprv"));
        assert_eq!(xpub.len(), 111);
        assert_eq!(xprv.len(), 111);

        let parsed: XPub = xpub.parse().unwrap();
        assert_eq!(parsed.attrs().depth, 4);
        assert_eq!(parsed.to_string(Prefix::XPUB), xpub);
    }

    #[test]
    fn bip32_vector_master_keys() {
        let master = bip32_vector_master();
        assert_eq!(
            master.xpub(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
        assert_eq!(
            master.xprv().as_str(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            master.private_key_hex().as_str(),
            "0xe8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(hex::encode(master.fingerprint()), "3442193e");
    }

    #[test]
    fn bad_path_is_reported() {
        let err = hardhat_root().derive_path("44'/60'").unwrap_err();
        assert_eq!(
            err,
            KeyPairError::DerivationError(DerivationError::InvalidPath("44'/60'".to_string()))
        );
    }

    #[test]
    fn hardened_index_rejected_for_child_step() {
        let err = hardhat_root()
            .derive_child(derivation::HARDENED_BIT)
            .unwrap_err();
        assert_eq!(
            err,
            KeyPairError::DerivationError(DerivationError::InvalidChildNumber)
        );
    }
}
