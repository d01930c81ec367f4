//! # Models Module
//!
//! Contains core data structures and type definitions for the wallet
//! transaction pipeline.

mod account;
pub use account::*;

mod amount;
pub use amount::*;

mod asset;
pub use asset::*;

mod error;
pub use error::*;

mod memo;
pub use memo::*;

mod network;
pub use network::*;

mod operation;
pub use operation::*;
