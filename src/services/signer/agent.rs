//! HTTP bridge to an out-of-process wallet signing agent.
//!
//! The agent owns the keys and the approval UI; this client only relays the
//! unsigned envelope and interprets the agent's structured responses. A
//! user refusal is recognized both from an explicit `declined` code and
//! from the free-text heuristics browser extensions actually emit
//! ("User rejected", "denied", "cancelled").

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::{Network, SignerError};
use crate::services::SignerGateway;

#[derive(Clone)]
pub struct AgentSignerClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SignRequest<'a> {
    xdr: &'a str,
    network_passphrase: &'a str,
    address: &'a str,
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    #[serde(default)]
    signed_tx_xdr: Option<String>,
    #[serde(default)]
    error: Option<AgentErrorBody>,
}

#[derive(Debug, Deserialize)]
struct AccessResponse {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    error: Option<AgentErrorBody>,
}

#[derive(Debug, Deserialize)]
struct AvailableResponse {
    #[serde(default)]
    connected: bool,
}

#[derive(Debug, Deserialize)]
struct AgentErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Whether an agent error represents the user choosing not to proceed.
fn is_decline(error: &AgentErrorBody) -> bool {
    if error.code.as_deref() == Some("declined") {
        return true;
    }
    let message = error.message.as_deref().unwrap_or_default().to_lowercase();
    ["rejected", "denied", "cancelled", "canceled"]
        .iter()
        .any(|needle| message.contains(needle))
}

fn agent_error(error: AgentErrorBody) -> SignerError {
    if is_decline(&error) {
        SignerError::Declined
    } else {
        SignerError::Failed(
            error
                .message
                .or(error.code)
                .unwrap_or_else(|| "agent reported an unspecified error".into()),
        )
    }
}

impl AgentSignerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SignerGateway for AgentSignerClient {
    async fn is_available(&self) -> Result<bool, SignerError> {
        let url = format!("{}/available", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Ok(false);
        }
        let body = response
            .json::<AvailableResponse>()
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;
        Ok(body.connected)
    }

    async fn request_access(&self) -> Result<String, SignerError> {
        let url = format!("{}/access", self.base_url);
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        let body = response
            .json::<AccessResponse>()
            .await
            .map_err(|e| SignerError::Failed(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(agent_error(error));
        }
        body.address
            .ok_or_else(|| SignerError::Failed("agent returned no address".into()))
    }

    async fn sign_transaction(
        &self,
        unsigned_xdr: &str,
        network: Network,
        address: &str,
    ) -> Result<String, SignerError> {
        let url = format!("{}/sign", self.base_url);
        debug!("Requesting signature from agent for {}", address);

        // No timeout here: the agent may be waiting on a user dialog for as
        // long as the platform allows.
        let response = self
            .client
            .post(&url)
            .json(&SignRequest {
                xdr: unsigned_xdr,
                network_passphrase: network.passphrase(),
                address,
            })
            .send()
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        let body = response
            .json::<SignResponse>()
            .await
            .map_err(|e| SignerError::Failed(e.to_string()))?;

        if let Some(error) = body.error {
            let mapped = agent_error(error);
            if matches!(mapped, SignerError::Declined) {
                info!("User declined to sign");
            }
            return Err(mapped);
        }
        body.signed_tx_xdr
            .ok_or_else(|| SignerError::Failed("agent returned no signed envelope".into()))
    }
}
