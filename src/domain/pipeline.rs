//! The build → sign → submit pipeline.
//!
//! One user action drives one linear run: load a fresh account snapshot,
//! validate inputs client-side, build the unsigned envelope, hand it to the
//! signer gateway, then submit the signed result. Each stage either
//! succeeds, fails with a typed error that short-circuits the run, or (for
//! submission transport failures) leaves the outcome explicitly unknown.
//!
//! Nothing here retries. Retry is always a caller decision, taken after a
//! fresh snapshot read; the snapshot bound into a failed envelope is dead.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};

use crate::constants::DEFAULT_TRUSTLINE_LIMIT_STROOPS;
use crate::domain::{
    build_envelope, envelope_to_xdr_base64, verify_signed_envelope, EnvelopeParams,
};
use crate::models::{
    AccountSnapshot, Amount, AssetSpec, HorizonError, MemoSpec, Network, OperationSpec,
    SubmissionOutcome, WalletError,
};
use crate::services::{HorizonClientTrait, SignerGateway};

pub struct WalletPipeline<P, S>
where
    P: HorizonClientTrait,
    S: SignerGateway,
{
    horizon: P,
    signer: S,
    network: Network,
    params: EnvelopeParams,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<P, S> WalletPipeline<P, S>
where
    P: HorizonClientTrait,
    S: SignerGateway,
{
    pub fn new(horizon: P, signer: S, network: Network) -> Self {
        Self {
            horizon,
            signer,
            network,
            params: EnvelopeParams::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_params(mut self, params: EnvelopeParams) -> Self {
        self.params = params;
        self
    }

    pub fn horizon(&self) -> &P {
        &self.horizon
    }

    /// Sends `amount` of `asset` from `source` to `destination`.
    ///
    /// The amount is checked against the snapshot's spendable balance before
    /// anything touches the signer; the gateway re-validates authoritatively.
    pub async fn send_payment(
        &self,
        source: &str,
        destination: &str,
        asset: AssetSpec,
        amount: Amount,
        memo: MemoSpec,
    ) -> Result<SubmissionOutcome, WalletError> {
        let fee = Amount::from_stroops(self.params.fee_per_operation as i64)?;
        self.run(source, memo, |snapshot| {
            let available = snapshot.spendable(&asset, fee);
            let op = OperationSpec::payment(destination, asset.clone(), amount, available)?;
            Ok(vec![op])
        })
        .await
    }

    /// Establishes a trustline from `source` to an issued asset, with the
    /// default limit unless one is given.
    pub async fn establish_trust(
        &self,
        source: &str,
        asset: AssetSpec,
        limit: Option<Amount>,
    ) -> Result<SubmissionOutcome, WalletError> {
        let limit = match limit {
            Some(l) => l,
            None => Amount::from_stroops(DEFAULT_TRUSTLINE_LIMIT_STROOPS)?,
        };
        self.run(source, MemoSpec::None, |_snapshot| {
            Ok(vec![OperationSpec::change_trust(asset.clone(), limit)?])
        })
        .await
    }

    /// The shared pipeline behind every user action. `make_operations` sees
    /// the freshly loaded snapshot so it can validate against current
    /// balances.
    async fn run<F>(
        &self,
        source: &str,
        memo: MemoSpec,
        make_operations: F,
    ) -> Result<SubmissionOutcome, WalletError>
    where
        F: FnOnce(&AccountSnapshot) -> Result<Vec<OperationSpec>, WalletError>,
    {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WalletError::Busy);
        }
        let _guard = FlightGuard(&self.in_flight);

        // Fresh snapshot every run; a cached sequence number is a rejected
        // submission waiting to happen.
        let snapshot = self.horizon.get_account(source).await?;
        let operations = make_operations(&snapshot)?;

        let params = EnvelopeParams {
            memo,
            ..self.params.clone()
        };
        let unsigned = build_envelope(&snapshot, &operations, &params)?;
        let unsigned_xdr = envelope_to_xdr_base64(&unsigned)?;

        info!(
            "Requesting signature for {} operation(s) from {}",
            operations.len(),
            source
        );
        let signed_xdr = self
            .signer
            .sign_transaction(&unsigned_xdr, self.network, source)
            .await
            .inspect_err(|e| {
                if matches!(e, crate::models::SignerError::Declined) {
                    info!("Signing declined; no submission attempted");
                }
            })?;

        // The sequence number was bound into the envelope before signing and
        // is never re-derived past this point.
        let signed = verify_signed_envelope(&unsigned, &signed_xdr)?;

        let outcome = self
            .horizon
            .submit_transaction(&envelope_to_xdr_base64(&signed)?)
            .await
            .inspect_err(|e| {
                if matches!(e, HorizonError::Unavailable(_)) {
                    warn!(
                        "Submission outcome unknown: {}. Re-query the account \
                         before retrying; do not blindly resubmit.",
                        e
                    );
                }
            })?;

        Ok(outcome)
    }
}
