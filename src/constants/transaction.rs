//! Constants for transaction construction and submission.
//!
//! Default values used throughout envelope building and Horizon
//! result interpretation: fees, validity windows and size limits.

/// Flat fee charged per operation, in stroops.
pub const BASE_FEE_STROOPS: u32 = 100;

/// How long a built envelope stays valid, in seconds. Submissions outside
/// this window are rejected by the gateway, never locally.
pub const DEFAULT_TX_VALIDITY_SECONDS: u64 = 30;

/// Maximum length of a text memo, in bytes (not characters).
pub const MAX_MEMO_BYTES: usize = 28;

/// Fractional digits of a ledger amount. One unit is 10^7 stroops.
pub const AMOUNT_DECIMALS: u32 = 7;

/// Stroops per whole asset unit.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Default trustline limit when the caller does not supply one, in stroops
/// (10,000 whole units).
pub const DEFAULT_TRUSTLINE_LIMIT_STROOPS: i64 = 10_000 * STROOPS_PER_UNIT;

/// How much of an unparsable gateway error body is kept in the rejection
/// detail.
pub const MAX_ERROR_BODY_EXCERPT: usize = 200;
