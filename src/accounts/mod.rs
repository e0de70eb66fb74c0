//! Signing accounts
//!
//! Signers are produced on demand by a [`SignerProvider`] and are only used
//! for display; nothing is persisted.

pub mod signer;

pub use signer::{
    list_accounts, provider_for, MnemonicSigners, RemoteSigners, Signer, SignerError,
    SignerProvider, DEFAULT_ACCOUNT_COUNT,
};
