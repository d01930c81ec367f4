//! # Signer Services
//!
//! The pipeline never holds signing keys itself; it hands the serialized
//! envelope to a [`SignerGateway`] and receives back a signed envelope or a
//! structured refusal. Two implementations are provided: an HTTP bridge to
//! an out-of-process wallet agent, and an in-memory ed25519 signer for
//! development and tests.

mod agent;
pub use agent::*;

mod local;
pub use local::*;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::models::{Network, SignerError};

/// Gateway to an external signing capability.
///
/// The sign call may block on a user interacting with the agent's dialog;
/// no timeout is imposed here, and cancellation arrives as
/// [`SignerError::Declined`], which is an expected terminal outcome rather
/// than a fault.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SignerGateway: Send + Sync {
    /// Capability probe: is the signing agent installed and reachable?
    async fn is_available(&self) -> Result<bool, SignerError>;

    /// Asks the agent for access to an account. May prompt the user;
    /// returns the account identifier or `Declined`.
    async fn request_access(&self) -> Result<String, SignerError>;

    /// Signs an unsigned envelope (base64 XDR) for `network` with the key
    /// behind `address`, returning the signed envelope's base64 XDR. The
    /// envelope bytes are read-only input; the signed artifact is new.
    async fn sign_transaction(
        &self,
        unsigned_xdr: &str,
        network: Network,
        address: &str,
    ) -> Result<String, SignerError>;
}
