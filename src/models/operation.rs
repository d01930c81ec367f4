//! Operation types and conversions.
//!
//! The pipeline supports two operations: a payment and a trustline change.
//! Builder functions validate all inputs up front so that a malformed
//! operation never reaches envelope construction, let alone the network.

use serde::{Deserialize, Serialize};
use soroban_rs::xdr::{
    Asset, ChangeTrustAsset, ChangeTrustOp, MuxedAccount as XdrMuxedAccount, MuxedAccountMed25519,
    Operation, OperationBody, PaymentOp, Uint256,
};
use std::convert::TryFrom;
use stellar_strkey::ed25519::{MuxedAccount, PublicKey};

use crate::models::{Amount, AssetSpec, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationSpec {
    Payment {
        destination: String,
        amount: Amount,
        asset: AssetSpec,
    },
    ChangeTrust {
        asset: AssetSpec,
        limit: Amount,
    },
}

impl OperationSpec {
    /// Builds a payment operation.
    ///
    /// `available` is the caller's current view of the spendable balance for
    /// `asset`; exceeding it fails fast client-side. The gateway re-validates
    /// authoritatively either way.
    pub fn payment(
        destination: &str,
        asset: AssetSpec,
        amount: Amount,
        available: Amount,
    ) -> Result<Self, ValidationError> {
        validate_destination(destination)?;
        if amount.is_zero() {
            return Err(ValidationError::InvalidAmount(
                "payment amount must be positive".into(),
            ));
        }
        if amount > available {
            return Err(ValidationError::InsufficientBalance {
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }
        Ok(OperationSpec::Payment {
            destination: destination.to_string(),
            amount,
            asset,
        })
    }

    /// Builds a trustline-change operation for an issued asset.
    pub fn change_trust(asset: AssetSpec, limit: Amount) -> Result<Self, ValidationError> {
        if asset.is_native() {
            return Err(ValidationError::TrustlineForNative);
        }
        if limit.is_zero() {
            return Err(ValidationError::InvalidAmount(
                "trustline limit must be positive".into(),
            ));
        }
        Ok(OperationSpec::ChangeTrust { asset, limit })
    }

    pub fn asset(&self) -> &AssetSpec {
        match self {
            OperationSpec::Payment { asset, .. } | OperationSpec::ChangeTrust { asset, .. } => {
                asset
            }
        }
    }
}

/// Parses a destination address into an XDR MuxedAccount, accepting both
/// M... muxed accounts and plain G... public keys.
fn parse_destination_address(destination: &str) -> Result<XdrMuxedAccount, ValidationError> {
    if let Ok(m) = MuxedAccount::from_string(destination) {
        Ok(XdrMuxedAccount::MuxedEd25519(MuxedAccountMed25519 {
            id: m.id,
            ed25519: Uint256(m.ed25519),
        }))
    } else {
        let pk = PublicKey::from_string(destination)
            .map_err(|_| ValidationError::InvalidDestination(destination.to_string()))?;
        Ok(XdrMuxedAccount::Ed25519(Uint256(pk.0)))
    }
}

fn validate_destination(destination: &str) -> Result<(), ValidationError> {
    parse_destination_address(destination).map(|_| ())
}

fn change_trust_line(asset: &AssetSpec) -> Result<ChangeTrustAsset, ValidationError> {
    match Asset::try_from(asset)? {
        Asset::Native => Ok(ChangeTrustAsset::Native),
        Asset::CreditAlphanum4(a) => Ok(ChangeTrustAsset::CreditAlphanum4(a)),
        Asset::CreditAlphanum12(a) => Ok(ChangeTrustAsset::CreditAlphanum12(a)),
    }
}

impl TryFrom<&OperationSpec> for Operation {
    type Error = ValidationError;

    fn try_from(op: &OperationSpec) -> Result<Self, Self::Error> {
        match op {
            OperationSpec::Payment {
                destination,
                amount,
                asset,
            } => Ok(Operation {
                source_account: None,
                body: OperationBody::Payment(PaymentOp {
                    destination: parse_destination_address(destination)?,
                    asset: Asset::try_from(asset)?,
                    amount: amount.stroops(),
                }),
            }),
            OperationSpec::ChangeTrust { asset, limit } => Ok(Operation {
                source_account: None,
                body: OperationBody::ChangeTrust(ChangeTrustOp {
                    line: change_trust_line(asset)?,
                    limit: limit.stroops(),
                }),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_DEST: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";
    const TEST_ISSUER: &str = "GBBD47IF6LWK7P7MDEVSCWR7DPUWV3NY3DTQEVFL4NAT4AQH3ZLLFLA5";

    fn amt(s: &str) -> Amount {
        Amount::parse(s).unwrap()
    }

    #[test]
    fn test_payment_builder_happy_path() {
        let op = OperationSpec::payment(
            TEST_DEST,
            AssetSpec::native(),
            amt("10.0000000"),
            amt("50.0000000"),
        )
        .unwrap();
        assert!(matches!(op, OperationSpec::Payment { .. }));

        let xdr_op = Operation::try_from(&op).unwrap();
        match xdr_op.body {
            OperationBody::Payment(p) => assert_eq!(p.amount, 100_000_000),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_payment_rejects_invalid_destination() {
        let err = OperationSpec::payment(
            "not-an-address",
            AssetSpec::native(),
            amt("1"),
            amt("10"),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDestination(_)));
    }

    #[test]
    fn test_payment_rejects_zero_amount() {
        let err =
            OperationSpec::payment(TEST_DEST, AssetSpec::native(), Amount::ZERO, amt("10"))
                .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAmount(_)));
    }

    #[test]
    fn test_payment_rejects_overspend() {
        let err = OperationSpec::payment(
            TEST_DEST,
            AssetSpec::native(),
            amt("10.0000001"),
            amt("10.0000000"),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_payment_at_exact_balance_is_allowed() {
        assert!(OperationSpec::payment(
            TEST_DEST,
            AssetSpec::native(),
            amt("10"),
            amt("10")
        )
        .is_ok());
    }

    #[test]
    fn test_change_trust_builder() {
        let usdc = AssetSpec::issued("USDC", TEST_ISSUER).unwrap();
        let op = OperationSpec::change_trust(usdc, amt("10000")).unwrap();

        let xdr_op = Operation::try_from(&op).unwrap();
        match xdr_op.body {
            OperationBody::ChangeTrust(ct) => {
                assert_eq!(ct.limit, 10_000 * 10_000_000);
                assert!(matches!(ct.line, ChangeTrustAsset::CreditAlphanum4(_)));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_change_trust_rejects_native() {
        let err = OperationSpec::change_trust(AssetSpec::native(), amt("1")).unwrap_err();
        assert_eq!(err, ValidationError::TrustlineForNative);
    }

    #[test]
    fn test_change_trust_rejects_zero_limit() {
        let usdc = AssetSpec::issued("USDC", TEST_ISSUER).unwrap();
        assert!(OperationSpec::change_trust(usdc, Amount::ZERO).is_err());
    }

    #[test]
    fn test_muxed_destination_accepted() {
        // M... addresses carry an extra id; the payment op keeps it.
        let muxed = "MA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVAAAAAAAAAAAAAJLK";
        assert!(OperationSpec::payment(muxed, AssetSpec::native(), amt("1"), amt("2")).is_ok());
    }
}
