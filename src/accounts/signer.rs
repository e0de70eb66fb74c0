//! Signer providers and the account listing

use std::io::Write;
use thiserror::Error;

use crate::config::AccountSource;
use crate::crypto::{KeyError, KeyPair};

/// Number of development accounts derived from a seed phrase
pub const DEFAULT_ACCOUNT_COUNT: u32 = 20;

/// Signer errors
#[derive(Error, Debug)]
pub enum SignerError {
    #[error("Key error: {0}")]
    KeyError(#[from] KeyError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Signer provider unavailable: {0}")]
    Unavailable(String),
}

/// A signing account
#[derive(Clone)]
pub struct Signer {
    pub index: u32,
    key_pair: KeyPair,
}

impl Signer {
    pub fn new(index: u32, key_pair: KeyPair) -> Self {
        Self { index, key_pair }
    }

    pub fn address(&self) -> String {
        self.key_pair.address()
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("index", &self.index)
            .field("address", &self.address())
            .finish()
    }
}

/// Source of the signing accounts of a network
pub trait SignerProvider {
    /// The available signers, in the provider's own order
    fn signers(&self) -> Result<Vec<Signer>, SignerError>;
}

/// Signers derived from a seed phrase
pub struct MnemonicSigners {
    mnemonic: String,
    count: u32,
}

impl MnemonicSigners {
    pub fn new(mnemonic: &str) -> Self {
        Self::with_count(mnemonic, DEFAULT_ACCOUNT_COUNT)
    }

    pub fn with_count(mnemonic: &str, count: u32) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            count,
        }
    }
}

impl SignerProvider for MnemonicSigners {
    fn signers(&self) -> Result<Vec<Signer>, SignerError> {
        (0..self.count)
            .map(|index| -> Result<Signer, SignerError> {
                Ok(Signer::new(index, KeyPair::derive(&self.mnemonic, index)?))
            })
            .collect()
    }
}

/// Accounts held by a remote node. Nothing is known locally.
pub struct RemoteSigners;

impl SignerProvider for RemoteSigners {
    fn signers(&self) -> Result<Vec<Signer>, SignerError> {
        log::info!("Accounts are managed by the remote node; no local signers");
        Ok(Vec::new())
    }
}

/// Pick the signer provider of an account source
pub fn provider_for(source: &AccountSource) -> Box<dyn SignerProvider + Send + Sync> {
    match source {
        AccountSource::Mnemonic(mnemonic) => Box::new(MnemonicSigners::new(mnemonic)),
        AccountSource::Remote => Box::new(RemoteSigners),
    }
}

/// Write one address per line in the order the provider yields them.
/// Returns the number of accounts written.
pub fn list_accounts<W: Write + ?Sized>(
    provider: &dyn SignerProvider,
    out: &mut W,
) -> Result<usize, SignerError> {
    let signers = provider.signers()?;
    for signer in &signers {
        writeln!(out, "{}", signer.address())?;
    }
    Ok(signers.len())
}
