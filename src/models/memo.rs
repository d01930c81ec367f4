//! Memo types and conversions.

use serde::{Deserialize, Serialize};
use soroban_rs::xdr::{Memo, StringM};
use std::convert::TryFrom;

use crate::constants::MAX_MEMO_BYTES;
use crate::models::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MemoSpec {
    #[default]
    None,
    Text {
        value: String,
    }, // ≤ 28 UTF-8 bytes
}

impl MemoSpec {
    /// Builds a text memo, rejecting anything over 28 bytes. Oversized input
    /// is an error, never silently truncated.
    pub fn text(value: &str) -> Result<Self, ValidationError> {
        let actual = value.len();
        if actual > MAX_MEMO_BYTES {
            return Err(ValidationError::MemoTooLong {
                max: MAX_MEMO_BYTES,
                actual,
            });
        }
        Ok(MemoSpec::Text {
            value: value.to_string(),
        })
    }
}

impl TryFrom<&MemoSpec> for Memo {
    type Error = ValidationError;

    fn try_from(m: &MemoSpec) -> Result<Self, Self::Error> {
        Ok(match m {
            MemoSpec::None => Memo::None,
            MemoSpec::Text { value } => {
                let text =
                    StringM::<28>::try_from(value.as_str()).map_err(|_| {
                        ValidationError::MemoTooLong {
                            max: MAX_MEMO_BYTES,
                            actual: value.len(),
                        }
                    })?;
                Memo::Text(text)
            }
        })
    }
}
