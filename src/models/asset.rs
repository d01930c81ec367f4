//! Asset types and conversions.
//!
//! The ledger knows the native asset and issued assets identified by
//! (code, issuer). Codes up to 4 characters use the alphanum4 XDR form,
//! 5-12 characters the alphanum12 form; [`AssetSpec::issued`] picks the
//! right variant so callers never deal with the split.

use serde::{Deserialize, Serialize};
use soroban_rs::xdr::{
    AccountId, AlphaNum12, AlphaNum4, Asset, AssetCode12, AssetCode4, PublicKey as XdrPublicKey,
    Uint256,
};
use std::convert::TryFrom;
use stellar_strkey::ed25519::PublicKey;

use crate::models::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetSpec {
    Native,
    Credit4 { code: String, issuer: String },
    Credit12 { code: String, issuer: String },
}

impl AssetSpec {
    pub fn native() -> Self {
        AssetSpec::Native
    }

    /// Builds an issued-asset reference, validating the code length and the
    /// issuer's account identifier.
    pub fn issued(code: &str, issuer: &str) -> Result<Self, ValidationError> {
        let len = code.len();
        if !(1..=12).contains(&len) {
            return Err(ValidationError::InvalidAssetCode(format!(
                "asset code must be 1-12 characters, got {:?}",
                code
            )));
        }
        if PublicKey::from_string(issuer).is_err() {
            return Err(ValidationError::InvalidIssuer(issuer.to_string()));
        }
        let code = code.to_string();
        let issuer = issuer.to_string();
        Ok(if len <= 4 {
            AssetSpec::Credit4 { code, issuer }
        } else {
            AssetSpec::Credit12 { code, issuer }
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetSpec::Native)
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            AssetSpec::Native => None,
            AssetSpec::Credit4 { code, .. } | AssetSpec::Credit12 { code, .. } => Some(code),
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        match self {
            AssetSpec::Native => None,
            AssetSpec::Credit4 { issuer, .. } | AssetSpec::Credit12 { issuer, .. } => Some(issuer),
        }
    }

    /// Matches a Horizon balance entry. Issued assets compare by (code,
    /// issuer).
    pub fn matches_entry(&self, asset_code: Option<&str>, asset_issuer: Option<&str>) -> bool {
        match self {
            AssetSpec::Native => asset_code.is_none() && asset_issuer.is_none(),
            _ => self.code() == asset_code && self.issuer() == asset_issuer,
        }
    }
}

impl TryFrom<&AssetSpec> for Asset {
    type Error = ValidationError;

    fn try_from(a: &AssetSpec) -> Result<Self, Self::Error> {
        Ok(match a {
            AssetSpec::Native => Asset::Native,
            AssetSpec::Credit4 { code, issuer } => {
                let b = code.as_bytes();
                if !(1..=4).contains(&b.len()) {
                    return Err(ValidationError::InvalidAssetCode(code.clone()));
                }
                let mut buf = [0u8; 4];
                buf[..b.len()].copy_from_slice(b);

                Asset::CreditAlphanum4(AlphaNum4 {
                    asset_code: AssetCode4(buf),
                    issuer: issuer_account_id(issuer)?,
                })
            }
            AssetSpec::Credit12 { code, issuer } => {
                let b = code.as_bytes();
                if !(5..=12).contains(&b.len()) {
                    return Err(ValidationError::InvalidAssetCode(code.clone()));
                }
                let mut buf = [0u8; 12];
                buf[..b.len()].copy_from_slice(b);

                Asset::CreditAlphanum12(AlphaNum12 {
                    asset_code: AssetCode12(buf),
                    issuer: issuer_account_id(issuer)?,
                })
            }
        })
    }
}

fn issuer_account_id(issuer: &str) -> Result<AccountId, ValidationError> {
    let pk = PublicKey::from_string(issuer)
        .map_err(|_| ValidationError::InvalidIssuer(issuer.into()))?;
    Ok(AccountId(XdrPublicKey::PublicKeyTypeEd25519(Uint256(pk.0))))
}
