//! Cryptographic utilities for development signers
//!
//! This module provides:
//! - Keccak-256 hashing and checksummed addresses
//! - BIP-39/BIP-44 secp256k1 key derivation from a seed phrase

pub mod hash;
pub mod keys;

pub use hash::{keccak256, to_checksum_address};
pub use keys::{public_key_to_address, KeyError, KeyPair};
