//! Ledger amounts.
//!
//! Amounts travel on the wire as decimal strings with at most 7 fractional
//! digits ("10.0000000") but are held internally in stroops, the smallest
//! unit (1 unit = 10^7 stroops). Parsing is exact: floats never enter the
//! picture, and an 8th fractional digit is a validation error, not a
//! rounding opportunity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_DECIMALS, STROOPS_PER_UNIT};
use crate::models::ValidationError;

/// A non-negative quantity of some asset, in stroops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Builds an amount from a stroop count. Negative counts are invalid.
    pub fn from_stroops(stroops: i64) -> Result<Self, ValidationError> {
        if stroops < 0 {
            return Err(ValidationError::InvalidAmount(format!(
                "negative stroop count: {}",
                stroops
            )));
        }
        Ok(Amount(stroops))
    }

    /// Parses a decimal string ("10", "10.5", "0.0000001") into stroops.
    ///
    /// Rejects empty input, signs, non-digits, more than 7 fractional
    /// digits, and values that overflow the stroop range.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError::InvalidAmount("empty amount".into()));
        }
        if s.starts_with('+') || s.starts_with('-') {
            return Err(ValidationError::InvalidAmount(format!(
                "signed amount not allowed: {}",
                s
            )));
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ValidationError::InvalidAmount(s.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ValidationError::InvalidAmount(format!(
                "not a decimal number: {}",
                s
            )));
        }
        if frac_part.len() > AMOUNT_DECIMALS as usize {
            return Err(ValidationError::InvalidAmount(format!(
                "more than {} fractional digits: {}",
                AMOUNT_DECIMALS, s
            )));
        }

        let units: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ValidationError::InvalidAmount(format!("integer overflow: {}", s)))?
        };

        let mut frac: i64 = 0;
        if !frac_part.is_empty() {
            frac = frac_part
                .parse()
                .map_err(|_| ValidationError::InvalidAmount(s.to_string()))?;
            for _ in frac_part.len()..AMOUNT_DECIMALS as usize {
                frac *= 10;
            }
        }

        units
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|v| v.checked_add(frac))
            .map(Amount)
            .ok_or_else(|| ValidationError::InvalidAmount(format!("amount out of range: {}", s)))
    }

    pub fn stroops(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_sub(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0).max(0))
    }
}

impl fmt::Display for Amount {
    /// Canonical 7-fractional-digit rendering, matching Horizon's balance
    /// strings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:07}",
            self.0 / STROOPS_PER_UNIT,
            self.0 % STROOPS_PER_UNIT
        )
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}
