//! Account snapshots.
//!
//! A snapshot is the gateway's current view of an account: its sequence
//! number and held balances. The sequence number is only authoritative at
//! the moment it is read, so a snapshot is loaded fresh immediately before
//! every envelope build and never cached across builds.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Amount, AssetSpec};

/// One entry of Horizon's `balances` array. Native entries carry no code or
/// issuer; issued entries identify the trustline they represent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub balance: String,
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

/// Current gateway state of one account, as returned by `GET /accounts/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub account_id: String,
    /// Horizon serializes the sequence as a decimal string.
    #[serde(deserialize_with = "sequence_from_string")]
    pub sequence: i64,
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
}

fn sequence_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl AccountSnapshot {
    /// Balance currently held for `asset`, if the account holds it at all.
    pub fn balance_for(&self, asset: &AssetSpec) -> Option<Amount> {
        self.balances
            .iter()
            .find(|b| asset.matches_entry(b.asset_code.as_deref(), b.asset_issuer.as_deref()))
            .and_then(|b| Amount::parse(&b.balance).ok())
    }

    /// Whether a trustline exists for `asset`. The native asset needs none.
    pub fn has_trustline(&self, asset: &AssetSpec) -> bool {
        if asset.is_native() {
            return true;
        }
        self.balances
            .iter()
            .any(|b| asset.matches_entry(b.asset_code.as_deref(), b.asset_issuer.as_deref()))
    }

    /// Client-side view of what can be spent: the held balance, with `fee`
    /// reserved when paying in the native asset. Indicative only; the
    /// gateway re-validates authoritatively.
    pub fn spendable(&self, asset: &AssetSpec, fee: Amount) -> Amount {
        let held = self.balance_for(asset).unwrap_or(Amount::ZERO);
        if asset.is_native() {
            held.saturating_sub(fee)
        } else {
            held
        }
    }
}
