//! In-memory ed25519 signer.
//!
//! Signs transaction envelopes with a locally held key: the signature
//! payload is the network id plus the transaction, serialized to XDR and
//! SHA-256 hashed, exactly what an external agent produces. Keys live in
//! process memory, so this implementation is for development and tests,
//! not production custody.

use async_trait::async_trait;
use ed25519_dalek::{Signer as Ed25519Signer, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use soroban_rs::xdr::{
    DecoratedSignature, Hash, Limits, MuxedAccount, Preconditions, ReadXdr, Signature,
    SignatureHint, Transaction, TransactionEnvelope, TransactionExt,
    TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction, Uint256, WriteXdr,
};
use stellar_strkey::ed25519::PublicKey;

use crate::models::{Network, SignerError};
use crate::services::SignerGateway;

pub struct LocalSigner {
    signing_key: SigningKey,
}

impl LocalSigner {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Generates a fresh random identity, e.g. for a new testnet account
    /// that friendbot will fund.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// The G... account identifier for this key.
    pub fn account_id(&self) -> String {
        PublicKey(self.signing_key.verifying_key().to_bytes()).to_string()
    }

    /// Builds the signature payload for an envelope: the network id plus
    /// the (V1-normalized) transaction.
    fn create_signature_payload(
        envelope: &TransactionEnvelope,
        network_id: &Hash,
    ) -> Result<TransactionSignaturePayload, SignerError> {
        let tagged_transaction = match envelope {
            TransactionEnvelope::TxV0(e) => {
                TransactionSignaturePayloadTaggedTransaction::Tx(convert_v0_to_v1(&e.tx))
            }
            TransactionEnvelope::Tx(e) => {
                TransactionSignaturePayloadTaggedTransaction::Tx(e.tx.clone())
            }
            TransactionEnvelope::TxFeeBump(e) => {
                TransactionSignaturePayloadTaggedTransaction::TxFeeBump(e.tx.clone())
            }
        };

        Ok(TransactionSignaturePayload {
            network_id: network_id.clone(),
            tagged_transaction,
        })
    }

    /// Signs the envelope for the given network id, returning a detached
    /// decorated signature.
    pub fn sign_envelope(
        &self,
        envelope: &TransactionEnvelope,
        network_id: &Hash,
    ) -> Result<DecoratedSignature, SignerError> {
        let payload = Self::create_signature_payload(envelope, network_id)?;
        let payload_bytes = payload
            .to_xdr(Limits::none())
            .map_err(|e| SignerError::Failed(format!("failed to serialize payload: {e}")))?;

        let hash = Sha256::digest(&payload_bytes);
        let signature = self.signing_key.sign(&hash);

        // Hint is the last 4 bytes of the public key.
        let public_key_bytes = self.signing_key.verifying_key().to_bytes();
        let hint_bytes: [u8; 4] = public_key_bytes[public_key_bytes.len() - 4..]
            .try_into()
            .map_err(|_| SignerError::Failed("failed to create signature hint".into()))?;

        Ok(DecoratedSignature {
            hint: SignatureHint(hint_bytes),
            signature: Signature(
                signature
                    .to_bytes()
                    .to_vec()
                    .try_into()
                    .map_err(|_| SignerError::Failed("signature length mismatch".into()))?,
            ),
        })
    }
}

fn convert_v0_to_v1(v0_tx: &soroban_rs::xdr::TransactionV0) -> Transaction {
    Transaction {
        source_account: MuxedAccount::Ed25519(Uint256(v0_tx.source_account_ed25519.0)),
        fee: v0_tx.fee,
        seq_num: v0_tx.seq_num.clone(),
        cond: match v0_tx.time_bounds.clone() {
            Some(tb) => Preconditions::Time(tb),
            None => Preconditions::None,
        },
        memo: v0_tx.memo.clone(),
        operations: v0_tx.operations.clone(),
        ext: TransactionExt::V0,
    }
}

fn append_signature(
    envelope: &mut TransactionEnvelope,
    signature: DecoratedSignature,
) -> Result<(), SignerError> {
    let push = |signatures: &soroban_rs::xdr::VecM<DecoratedSignature, 20>| {
        let mut all = signatures.to_vec();
        all.push(signature.clone());
        all.try_into()
            .map_err(|_| SignerError::Failed("too many signatures (max 20)".into()))
    };
    match envelope {
        TransactionEnvelope::TxV0(e) => e.signatures = push(&e.signatures)?,
        TransactionEnvelope::Tx(e) => e.signatures = push(&e.signatures)?,
        TransactionEnvelope::TxFeeBump(e) => e.signatures = push(&e.signatures)?,
    }
    Ok(())
}

#[async_trait]
impl SignerGateway for LocalSigner {
    async fn is_available(&self) -> Result<bool, SignerError> {
        Ok(true)
    }

    async fn request_access(&self) -> Result<String, SignerError> {
        Ok(self.account_id())
    }

    async fn sign_transaction(
        &self,
        unsigned_xdr: &str,
        network: Network,
        address: &str,
    ) -> Result<String, SignerError> {
        if address != self.account_id() {
            return Err(SignerError::Failed(format!(
                "no key for account {}",
                address
            )));
        }

        let mut envelope = TransactionEnvelope::from_xdr_base64(unsigned_xdr, Limits::none())
            .map_err(|e| SignerError::Failed(format!("invalid envelope XDR: {e}")))?;

        let signature = self.sign_envelope(&envelope, &network.network_id())?;
        append_signature(&mut envelope, signature)?;

        envelope
            .to_xdr_base64(Limits::none())
            .map_err(|e| SignerError::Failed(format!("failed to serialize envelope: {e}")))
    }
}
