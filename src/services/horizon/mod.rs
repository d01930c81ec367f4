//! Horizon gateway client.
//!
//! Implements the two network reads the pipeline depends on: loading a fresh
//! account snapshot and submitting a signed envelope. Submission responses
//! are interpreted into a typed [`SubmissionOutcome`]; Horizon's
//! `extras.result_codes` strings are normalized into [`RejectionKind`] so
//! callers never pattern-match raw gateway text.
//!
//! No retries happen here. A transport failure during submission surfaces as
//! [`HorizonError::Unavailable`], which means the envelope's fate is
//! unknown, not negative; the caller's recovery is a fresh account query.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

#[cfg(test)]
use mockall::automock;

use crate::config::WalletConfig;
use crate::constants::MAX_ERROR_BODY_EXCERPT;
use crate::models::{AccountSnapshot, HorizonError, RejectionKind, SubmissionOutcome};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait HorizonClientTrait: Send + Sync {
    /// Loads the current snapshot for `account_id`. Never cached; the
    /// embedded sequence number is only valid for the build that follows
    /// immediately.
    async fn get_account(&self, account_id: &str) -> Result<AccountSnapshot, HorizonError>;

    /// Posts a signed envelope (base64 XDR) to the gateway and interprets
    /// the response.
    async fn submit_transaction(
        &self,
        signed_xdr: &str,
    ) -> Result<SubmissionOutcome, HorizonError>;

    /// Asks the testnet faucet to fund a freshly generated account.
    async fn fund_with_friendbot(&self, account_id: &str) -> Result<(), HorizonError>;
}

#[derive(Clone, Debug)]
pub struct HorizonClient {
    client: reqwest::Client,
    base_url: String,
    friendbot_url: Option<String>,
}

/// Successful submission body: the transaction hash is all we consume.
#[derive(Debug, Deserialize)]
struct SubmitSuccessBody {
    hash: String,
}

/// Horizon problem+json error body, reduced to the fields this client reads.
#[derive(Debug, Deserialize, Default)]
struct HorizonProblemBody {
    #[serde(default)]
    extras: Option<ProblemExtras>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default, rename = "type")]
    problem_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ProblemExtras {
    #[serde(default)]
    result_codes: Option<ResultCodes>,
}

/// Machine-readable rejection reasons, distinct from human-readable text.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Option<Vec<String>>,
}

/// Maps Horizon result codes onto the normalized rejection taxonomy.
/// Transaction-level codes win over operation-level ones.
pub fn map_result_codes(codes: &ResultCodes) -> RejectionKind {
    if let Some(tx_code) = codes.transaction.as_deref() {
        match tx_code {
            "tx_bad_seq" => return RejectionKind::BadSequence,
            "tx_insufficient_balance" => return RejectionKind::InsufficientFunds,
            "tx_malformed" => return RejectionKind::MalformedOperation,
            _ => {}
        }
    }
    if let Some(ops) = &codes.operations {
        for op_code in ops {
            match op_code.as_str() {
                "op_underfunded" => return RejectionKind::InsufficientFunds,
                "op_no_trust" | "op_no_issuer" => return RejectionKind::NoTrustline,
                "op_malformed" | "op_no_destination" => return RejectionKind::MalformedOperation,
                _ => {}
            }
        }
    }
    RejectionKind::Unknown
}

fn result_codes_detail(codes: &ResultCodes) -> String {
    let mut parts = Vec::new();
    if let Some(tx) = &codes.transaction {
        parts.push(tx.clone());
    }
    if let Some(ops) = &codes.operations {
        parts.extend(ops.iter().cloned());
    }
    parts.join(", ")
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= MAX_ERROR_BODY_EXCERPT {
        trimmed.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_EXCERPT;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        trimmed[..end].to_string()
    }
}

impl HorizonClient {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.horizon_url().trim_end_matches('/').to_string(),
            friendbot_url: config.friendbot_url(),
        }
    }

    /// Turns a non-2xx submission body into a typed rejection. A body with
    /// result codes gets the mapped taxonomy; anything unparsable becomes
    /// `Unknown` with a raw excerpt.
    fn interpret_rejection(status: reqwest::StatusCode, body: &str) -> SubmissionOutcome {
        match serde_json::from_str::<HorizonProblemBody>(body) {
            Ok(problem) => {
                if let Some(codes) = problem.extras.as_ref().and_then(|e| e.result_codes.as_ref())
                {
                    return SubmissionOutcome::Rejected {
                        kind: map_result_codes(codes),
                        detail: result_codes_detail(codes),
                    };
                }
                let detail = problem
                    .detail
                    .or_else(|| match (problem.problem_type, problem.title) {
                        (Some(t), Some(title)) => Some(format!("{}: {}", t, title)),
                        (Some(t), None) => Some(t),
                        (None, Some(title)) => Some(title),
                        (None, None) => None,
                    })
                    .unwrap_or_else(|| excerpt(body));
                SubmissionOutcome::Rejected {
                    kind: RejectionKind::Unknown,
                    detail,
                }
            }
            Err(_) => SubmissionOutcome::Rejected {
                kind: RejectionKind::Unknown,
                detail: format!("HTTP {}: {}", status.as_u16(), excerpt(body)),
            },
        }
    }
}

#[async_trait]
impl HorizonClientTrait for HorizonClient {
    async fn get_account(&self, account_id: &str) -> Result<AccountSnapshot, HorizonError> {
        let url = format!("{}/accounts/{}", self.base_url, account_id);
        debug!("Loading account snapshot: {}", account_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HorizonError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(HorizonError::AccountNotFound(account_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(HorizonError::Unavailable(format!(
                "account fetch returned HTTP {}",
                response.status().as_u16()
            )));
        }

        response
            .json::<AccountSnapshot>()
            .await
            .map_err(|e| HorizonError::UnexpectedResponse(e.to_string()))
    }

    async fn submit_transaction(
        &self,
        signed_xdr: &str,
    ) -> Result<SubmissionOutcome, HorizonError> {
        // The agent may hand back XDR with stray whitespace; any of it would
        // invalidate the signature check on the gateway side.
        let cleaned: String = signed_xdr.split_whitespace().collect();
        let url = format!("{}/transactions", self.base_url);

        let response = self
            .client
            .post(&url)
            .form(&[("tx", cleaned.as_str())])
            .send()
            .await
            .map_err(|e| HorizonError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body = response
                .json::<SubmitSuccessBody>()
                .await
                .map_err(|e| HorizonError::UnexpectedResponse(e.to_string()))?;
            info!("Transaction accepted: {}", body.hash);
            return Ok(SubmissionOutcome::Accepted { hash: body.hash });
        }

        let body = response
            .text()
            .await
            .map_err(|e| HorizonError::Unavailable(e.to_string()))?;
        let outcome = Self::interpret_rejection(status, &body);
        if let SubmissionOutcome::Rejected { kind, detail } = &outcome {
            warn!("Transaction rejected ({:?}): {}", kind, detail);
        }
        Ok(outcome)
    }

    async fn fund_with_friendbot(&self, account_id: &str) -> Result<(), HorizonError> {
        let base = self.friendbot_url.as_deref().ok_or_else(|| {
            HorizonError::Unavailable("no friendbot configured for this network".into())
        })?;
        let url = format!("{}/?addr={}", base.trim_end_matches('/'), account_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HorizonError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HorizonError::Unavailable(format!(
                "friendbot returned HTTP {}",
                response.status().as_u16()
            )));
        }
        info!("Friendbot funded account {}", account_id);
        Ok(())
    }
}
