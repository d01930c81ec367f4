//! Configuration for the wallet pipeline.
//!
//! Endpoints default per network and can be overridden for local test
//! stacks (quickstart containers, mock gateways).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Network;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Friendbot is only available on testnet")]
    FriendbotOnPublicNetwork,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub network: Network,
    /// Horizon base URL; defaults to the public instance for the network.
    #[serde(default)]
    pub horizon_url: Option<String>,
    /// Faucet base URL; testnet only.
    #[serde(default)]
    pub friendbot_url: Option<String>,
    /// Base URL of the out-of-process signing agent's bridge.
    #[serde(default)]
    pub signer_agent_url: Option<String>,
}

impl WalletConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            horizon_url: None,
            friendbot_url: None,
            signer_agent_url: None,
        }
    }

    pub fn horizon_url(&self) -> String {
        self.horizon_url
            .clone()
            .unwrap_or_else(|| self.network.default_horizon_url().to_string())
    }

    pub fn friendbot_url(&self) -> Option<String> {
        self.friendbot_url
            .clone()
            .or_else(|| self.network.default_friendbot_url().map(str::to_string))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("horizon_url", &self.horizon_url),
            ("friendbot_url", &self.friendbot_url),
            ("signer_agent_url", &self.signer_agent_url),
        ] {
            if let Some(url) = value {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidUrl {
                        field,
                        value: url.clone(),
                    });
                }
            }
        }
        if self.network == Network::Public && self.friendbot_url.is_some() {
            return Err(ConfigError::FriendbotOnPublicNetwork);
        }
        Ok(())
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::new(Network::Testnet)
    }
}
