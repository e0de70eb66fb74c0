//! Network deployment profiles

use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use super::env::{
    EnvVars, GOERLI_MNEMONIC, GOERLI_URL, RINKEBY_MNEMONIC, RINKEBY_URL, RPC_PORT, TEST_MNEMONIC,
};
use super::ConfigError;

/// Name of the in-process test network
pub const IN_PROCESS_NETWORK: &str = "hardhat";
/// Name of the network used when none is requested
pub const DEFAULT_NETWORK: &str = "localhost";
/// Port of the local RPC endpoint when `RPC_PORT` is unset
pub const DEFAULT_RPC_PORT: u16 = 8545;
/// Gas price used on public test networks (2 gwei)
pub const TESTNET_GAS_PRICE: u64 = 2_000_000_000;
/// Gas cap of the in-process network, below its 30M block gas limit
pub const IN_PROCESS_GAS_CAP: u64 = 25_000_000;
/// Seed phrase of the in-process network when `TEST_MNEMONIC` is unset
pub const DEFAULT_TEST_MNEMONIC: &str =
    "test test test test test test test test test test test junk";
/// Request timeout against a local node; some tests are very slow
pub const LOCALHOST_TIMEOUT: Duration = Duration::from_millis(120_000);

/// Where the signing accounts of a network come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// Derived from a seed phrase
    Mnemonic(String),
    /// Whatever the remote node exposes
    Remote,
}

// Seed phrases never leave the process through serialized config.
impl Serialize for AccountSource {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Mnemonic(_) => s.serialize_str("mnemonic"),
            Self::Remote => s.serialize_str("remote"),
        }
    }
}

impl AccountSource {
    fn from_mnemonic(mnemonic: Option<String>) -> Self {
        mnemonic.map(Self::Mnemonic).unwrap_or(Self::Remote)
    }
}

/// A named deployment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    /// RPC endpoint; `None` for the in-process network or an unset env var
    pub url: Option<String>,
    /// Fixed gas price in wei
    pub gas_price: Option<u64>,
    pub accounts: AccountSource,
    #[serde(with = "millis")]
    pub timeout: Option<Duration>,
    /// Per-transaction gas ceiling
    pub gas: Option<u64>,
    pub allow_unlimited_contract_size: bool,
}

impl NetworkProfile {
    /// A profile with only an endpoint set
    pub fn remote(url: Option<String>) -> Self {
        Self {
            url,
            gas_price: None,
            accounts: AccountSource::Remote,
            timeout: None,
            gas: None,
            allow_unlimited_contract_size: false,
        }
    }
}

/// The network profile table
#[derive(Debug, Clone, Serialize)]
pub struct Networks {
    pub default_network: String,
    profiles: BTreeMap<String, NetworkProfile>,
}

impl Networks {
    /// Build the standard profile table from the environment
    pub fn from_env(env: &EnvVars) -> Result<Self, ConfigError> {
        let rpc_port: u16 = env.parse_or(RPC_PORT, DEFAULT_RPC_PORT)?;

        let mut profiles = BTreeMap::new();

        profiles.insert(
            IN_PROCESS_NETWORK.to_string(),
            NetworkProfile {
                allow_unlimited_contract_size: true,
                accounts: AccountSource::Mnemonic(
                    env.get_string(TEST_MNEMONIC)
                        .unwrap_or_else(|| DEFAULT_TEST_MNEMONIC.to_string()),
                ),
                gas: Some(IN_PROCESS_GAS_CAP),
                ..NetworkProfile::remote(None)
            },
        );

        for (name, url_key, mnemonic_key) in [
            ("rinkeby", RINKEBY_URL, RINKEBY_MNEMONIC),
            ("goerli", GOERLI_URL, GOERLI_MNEMONIC),
        ] {
            profiles.insert(
                name.to_string(),
                NetworkProfile {
                    gas_price: Some(TESTNET_GAS_PRICE),
                    accounts: AccountSource::from_mnemonic(env.get_string(mnemonic_key)),
                    ..NetworkProfile::remote(env.get_string(url_key))
                },
            );
        }

        profiles.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkProfile {
                timeout: Some(LOCALHOST_TIMEOUT),
                ..NetworkProfile::remote(Some(format!("http://localhost:{}", rpc_port)))
            },
        );

        Ok(Self {
            default_network: DEFAULT_NETWORK.to_string(),
            profiles,
        })
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Option<&NetworkProfile> {
        self.profiles.get(name)
    }

    /// Look up a profile, or the default network when `name` is `None`
    pub fn resolve(&self, name: Option<&str>) -> Result<(&str, &NetworkProfile), ConfigError> {
        let name = name.unwrap_or(&self.default_network);
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// Iterate over profiles sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NetworkProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&(d.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }
}
