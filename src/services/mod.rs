//! # Services Module
//!
//! Implements the external collaborators of the pipeline: the Horizon
//! gateway and the signing capabilities.

mod horizon;
pub use horizon::*;

mod signer;
pub use signer::*;
