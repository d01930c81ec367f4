//! Ledger network identification.
//!
//! An envelope is scoped to one network by hashing that network's passphrase
//! into every signature payload, which prevents a testnet envelope from being
//! replayed against the public network.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use soroban_rs::xdr::Hash;

pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";
pub const PUBLIC_HORIZON_URL: &str = "https://horizon.stellar.org";
pub const TESTNET_FRIENDBOT_URL: &str = "https://friendbot.stellar.org";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Public,
}

impl Network {
    pub fn passphrase(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_PASSPHRASE,
            Network::Public => PUBLIC_PASSPHRASE,
        }
    }

    /// Network id bound into signature payloads: SHA-256 of the passphrase.
    pub fn network_id(&self) -> Hash {
        let digest: [u8; 32] = Sha256::digest(self.passphrase().as_bytes()).into();
        Hash(digest)
    }

    pub fn default_horizon_url(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_HORIZON_URL,
            Network::Public => PUBLIC_HORIZON_URL,
        }
    }

    /// The faucet only exists on testnet.
    pub fn default_friendbot_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some(TESTNET_FRIENDBOT_URL),
            Network::Public => None,
        }
    }
}
