//! Envelope construction and XDR helpers.
//!
//! The builder assembles operations, fee, memo and a validity window into an
//! unsigned V1 transaction envelope. Serialization is deterministic: the
//! same snapshot, operations and window always produce byte-identical XDR,
//! which is what the signer binds its signature to. The embedded sequence
//! number is always the snapshot's sequence plus one, never the loaded
//! value itself.

use std::time::{SystemTime, UNIX_EPOCH};

use soroban_rs::xdr::{
    Limits, Memo, MuxedAccount, Operation, Preconditions, ReadXdr, SequenceNumber, TimeBounds,
    TimePoint, Transaction, TransactionEnvelope, TransactionExt, TransactionV1Envelope, Uint256,
    VecM, WriteXdr,
};
use stellar_strkey::ed25519::PublicKey;

use crate::constants::{BASE_FEE_STROOPS, DEFAULT_TX_VALIDITY_SECONDS};
use crate::models::{AccountSnapshot, MemoSpec, OperationSpec, ValidationError, WalletError};

#[derive(Debug, Clone)]
pub struct EnvelopeParams {
    /// Flat fee per operation, in stroops. The envelope fee is this times
    /// the operation count.
    pub fee_per_operation: u32,
    pub memo: MemoSpec,
    pub validity_seconds: u64,
}

impl Default for EnvelopeParams {
    fn default() -> Self {
        Self {
            fee_per_operation: BASE_FEE_STROOPS,
            memo: MemoSpec::None,
            validity_seconds: DEFAULT_TX_VALIDITY_SECONDS,
        }
    }
}

/// Builds an unsigned envelope with the validity window starting now.
pub fn build_envelope(
    account: &AccountSnapshot,
    operations: &[OperationSpec],
    params: &EnvelopeParams,
) -> Result<TransactionEnvelope, WalletError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| WalletError::Xdr(format!("system clock before epoch: {e}")))?
        .as_secs();
    build_envelope_at(account, operations, params, now)
}

/// Deterministic builder core: `now_unix` anchors the validity window, so
/// identical inputs yield byte-identical envelopes.
pub fn build_envelope_at(
    account: &AccountSnapshot,
    operations: &[OperationSpec],
    params: &EnvelopeParams,
    now_unix: u64,
) -> Result<TransactionEnvelope, WalletError> {
    if operations.is_empty() {
        return Err(ValidationError::EmptyOperations.into());
    }

    let source_account = string_to_muxed_account(&account.account_id)
        .map_err(|_| WalletError::Xdr(format!("invalid source account: {}", account.account_id)))?;

    let fee = params
        .fee_per_operation
        .checked_mul(operations.len() as u32)
        .ok_or_else(|| WalletError::Xdr("fee overflow".into()))?;

    let sequence = account
        .sequence
        .checked_add(1)
        .ok_or_else(|| WalletError::Xdr("sequence overflow".into()))?;

    let memo = Memo::try_from(&params.memo).map_err(WalletError::Validation)?;

    let xdr_ops: Vec<Operation> = operations
        .iter()
        .map(Operation::try_from)
        .collect::<Result<_, _>>()
        .map_err(WalletError::Validation)?;
    let operations: VecM<Operation, 100> = xdr_ops
        .try_into()
        .map_err(|_| WalletError::Xdr("too many operations (max 100)".into()))?;

    let tx = Transaction {
        source_account,
        fee,
        seq_num: SequenceNumber(sequence),
        cond: Preconditions::Time(TimeBounds {
            min_time: TimePoint(now_unix),
            max_time: TimePoint(now_unix + params.validity_seconds),
        }),
        memo,
        operations,
        ext: TransactionExt::V0,
    };

    Ok(TransactionEnvelope::Tx(TransactionV1Envelope {
        tx,
        signatures: VecM::default(),
    }))
}

/// Canonical base64 XDR of an envelope, the form signers and the gateway
/// consume.
pub fn envelope_to_xdr_base64(envelope: &TransactionEnvelope) -> Result<String, WalletError> {
    envelope
        .to_xdr_base64(Limits::none())
        .map_err(|e| WalletError::Xdr(e.to_string()))
}

/// Check if a transaction envelope is signed
pub fn is_signed(envelope: &TransactionEnvelope) -> bool {
    match envelope {
        TransactionEnvelope::TxV0(e) => !e.signatures.is_empty(),
        TransactionEnvelope::Tx(e) => !e.signatures.is_empty(),
        TransactionEnvelope::TxFeeBump(e) => !e.signatures.is_empty(),
    }
}

/// Parses the signer's output and checks it is the same transaction that
/// was handed out, now carrying at least one signature. The signer returns
/// a new artifact; it must not have altered the transaction body, or the
/// sequence/fee the caller validated would no longer be what gets
/// submitted.
pub fn verify_signed_envelope(
    unsigned: &TransactionEnvelope,
    signed_xdr: &str,
) -> Result<TransactionEnvelope, WalletError> {
    let signed = TransactionEnvelope::from_xdr_base64(signed_xdr.trim(), Limits::none())
        .map_err(|e| WalletError::Xdr(format!("invalid signed envelope XDR: {e}")))?;

    if !is_signed(&signed) {
        return Err(WalletError::Xdr(
            "signer returned an unsigned envelope".into(),
        ));
    }

    match (unsigned, &signed) {
        (TransactionEnvelope::Tx(before), TransactionEnvelope::Tx(after)) => {
            if before.tx != after.tx {
                return Err(WalletError::Xdr(
                    "signer altered the transaction body".into(),
                ));
            }
        }
        _ => {
            return Err(WalletError::Xdr(
                "signer changed the envelope type".into(),
            ));
        }
    }

    Ok(signed)
}

/// Convert a G... account identifier to an XDR MuxedAccount
pub fn string_to_muxed_account(address: &str) -> Result<MuxedAccount, WalletError> {
    let pk = PublicKey::from_string(address)
        .map_err(|e| WalletError::Xdr(format!("failed to decode account id: {e}")))?;
    Ok(MuxedAccount::Ed25519(Uint256(pk.0)))
}

/// Convert an XDR MuxedAccount back to its G... identifier
pub fn muxed_account_to_string(muxed: &MuxedAccount) -> String {
    match muxed {
        MuxedAccount::Ed25519(key) => PublicKey(key.0).to_string(),
        MuxedAccount::MuxedEd25519(m) => PublicKey(m.ed25519.0).to_string(),
    }
}
