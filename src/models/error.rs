//! Error taxonomy for the wallet transaction pipeline.
//!
//! Validation failures are caught before any network call and never retried
//! automatically. Gateway-level rejections carry a normalized `RejectionKind`
//! rather than Horizon's raw strings. A transport failure during submission
//! is deliberately distinct from a rejection: it means the outcome is
//! unknown, and the caller must re-query account state rather than resubmit.

use serde::Serialize;
use thiserror::Error;

/// Input errors caught client-side, before the pipeline touches the network.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ValidationError {
    /// Asset codes are 1-12 alphanumeric characters
    #[error("Invalid asset code: {0}")]
    InvalidAssetCode(String),

    /// Issuer is not a valid ed25519 public key (G...)
    #[error("Invalid asset issuer: {0}")]
    InvalidIssuer(String),

    /// Destination is not a valid account identifier
    #[error("Invalid destination address: {0}")]
    InvalidDestination(String),

    /// Amount is non-positive, non-numeric, or exceeds 7 fractional digits
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount exceeds the client-side view of the available balance
    #[error("Insufficient balance: {requested} requested, {available} available")]
    InsufficientBalance { requested: String, available: String },

    /// Text memos are limited to 28 bytes; oversized memos are rejected,
    /// never truncated
    #[error("Memo exceeds {max} bytes ({actual} bytes)")]
    MemoTooLong { max: usize, actual: usize },

    /// An envelope must carry at least one operation
    #[error("Transaction must have at least one operation")]
    EmptyOperations,

    /// A trustline to the native asset is meaningless
    #[error("Cannot establish a trustline for the native asset")]
    TrustlineForNative,
}

/// Normalized taxonomy of gateway-level rejections, derived from Horizon's
/// `extras.result_codes`.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// Source account cannot cover amount plus fee (`tx_insufficient_balance`,
    /// `op_underfunded`)
    InsufficientFunds,
    /// Envelope sequence does not match the account (`tx_bad_seq`)
    BadSequence,
    /// Destination holds no trustline for the asset (`op_no_trust`,
    /// `op_no_issuer`)
    NoTrustline,
    /// Structurally invalid transaction or operation (`tx_malformed`,
    /// `op_malformed`, `op_no_destination`)
    MalformedOperation,
    /// Anything the mapping does not recognize
    Unknown,
}

/// Outcome of posting a signed envelope to the gateway.
///
/// A transport failure is not an outcome: it surfaces as
/// [`HorizonError::Unavailable`] because the envelope's fate is unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Accepted {
        hash: String,
    },
    Rejected {
        kind: RejectionKind,
        detail: String,
    },
}

/// Errors from the Horizon gateway service.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum HorizonError {
    /// The gateway reports no such account. Common for freshly generated,
    /// unfunded accounts; recoverable by funding first.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Transport failure or unexpected gateway status. When returned from a
    /// submission the transaction's fate is unconfirmed; re-query account
    /// state before deciding anything.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),

    /// The gateway answered with a body this client cannot interpret.
    #[error("Unexpected gateway response: {0}")]
    UnexpectedResponse(String),
}

/// Errors from the external signer gateway.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum SignerError {
    /// The user chose not to sign. Terminal for this attempt, not a fault.
    #[error("Signing declined by user")]
    Declined,

    /// Agent-reported failure, surfaced verbatim. Not auto-retried; agent
    /// state may require user intervention.
    #[error("Signing failed: {0}")]
    Failed(String),

    /// The signing agent cannot be reached or is not installed.
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}

/// Umbrella error for a pipeline run.
#[derive(Error, Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum WalletError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Horizon(#[from] HorizonError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    /// XDR encode/decode failure while handling an envelope.
    #[error("XDR error: {0}")]
    Xdr(String),

    /// Another pipeline run is in flight for this wallet.
    #[error("Another submission is in flight")]
    Busy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MemoTooLong { max: 28, actual: 29 };
        assert_eq!(err.to_string(), "Memo exceeds 28 bytes (29 bytes)");

        let err = ValidationError::InsufficientBalance {
            requested: "100.0000000".into(),
            available: "50.0000000".into(),
        };
        assert!(err.to_string().contains("100.0000000 requested"));
    }

    #[test]
    fn test_wallet_error_from_conversions() {
        let err: WalletError = ValidationError::EmptyOperations.into();
        assert!(matches!(err, WalletError::Validation(_)));

        let err: WalletError = SignerError::Declined.into();
        assert!(matches!(err, WalletError::Signer(SignerError::Declined)));

        let err: WalletError = HorizonError::AccountNotFound("GABC".into()).into();
        assert!(matches!(err, WalletError::Horizon(_)));
    }

    #[test]
    fn test_unavailable_message_mentions_unconfirmed_state() {
        let err = HorizonError::Unavailable("connection reset".into());
        assert!(err.to_string().starts_with("Gateway unavailable"));
    }

    #[test]
    fn test_submission_outcome_serde() {
        let outcome = SubmissionOutcome::Rejected {
            kind: RejectionKind::NoTrustline,
            detail: "op_no_trust".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["kind"], "no_trustline");
    }
}
