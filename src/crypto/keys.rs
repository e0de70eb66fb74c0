//! Hierarchical deterministic secp256k1 signing keys
//!
//! Development signers are derived from a BIP-39 seed phrase along the
//! BIP-44 Ethereum path, so every run of the pipeline sees the same accounts
//! in the same order as any other wallet holding the phrase.

use coins_bip32::prelude::SigningKey;
use coins_bip39::{English, Mnemonic};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

use super::hash::{keccak256, to_checksum_address};

/// Derivation path prefix; the account index is appended
pub const DERIVATION_PATH_PREFIX: &str = "m/44'/60'/0'/0";

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Empty seed phrase")]
    EmptyMnemonic,
    #[error("Invalid seed phrase: {0}")]
    InvalidMnemonic(String),
    #[error("Could not derive a key at index {index}: {reason}")]
    DerivationFailed { index: u32, reason: String },
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Derive the key at `m/44'/60'/0'/0/<index>` from a seed phrase
    pub fn derive(mnemonic: &str, index: u32) -> Result<Self, KeyError> {
        let phrase = normalize_mnemonic(mnemonic);
        if phrase.is_empty() {
            return Err(KeyError::EmptyMnemonic);
        }

        let mnemonic = Mnemonic::<English>::new_from_phrase(&phrase)
            .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))?;

        let path = format!("{}/{}", DERIVATION_PATH_PREFIX, index);
        let xpriv = mnemonic
            .derive_key(path.as_str(), None)
            .map_err(|e| KeyError::DerivationFailed {
                index,
                reason: e.to_string(),
            })?;

        let signing_key: &SigningKey = xpriv.as_ref();
        let secret_key = SecretKey::from_slice(&signing_key.to_bytes())
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Checksummed `0x`-prefixed account address
    pub fn address(&self) -> String {
        public_key_to_address(&self.public_key)
    }
}

/// Keccak-256 of the uncompressed public key, last 20 bytes, checksummed
pub fn public_key_to_address(public_key: &PublicKey) -> String {
    let uncompressed = public_key.serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    to_checksum_address(&address)
}

/// Collapse whitespace so that reformatted phrases derive the same keys
fn normalize_mnemonic(mnemonic: &str) -> String {
    mnemonic.split_whitespace().collect::<Vec<_>>().join(" ")
}
