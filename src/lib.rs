//! Stellar Wallet Transaction Core
//!
//! This library implements the transaction pipeline of a Stellar wallet:
//! building operation envelopes against a fresh account snapshot, handing
//! them to an external signing agent, and submitting the signed result to a
//! Horizon gateway. It includes:
//!
//! - Typed models for assets, amounts, memos and operations
//! - Deterministic XDR envelope construction
//! - An injectable signer gateway (out-of-process agent or local key)
//! - Horizon submission with structured result-code interpretation
//!
//! # Module Structure
//!
//! - `config`: Network and endpoint configuration
//! - `constants`: Fees, validity windows and limits
//! - `domain`: Envelope construction and the send pipeline
//! - `logging`: Logging setup
//! - `models`: Data structures and the error taxonomy
//! - `services`: Horizon gateway and signer integrations

pub mod config;
pub mod constants;
pub mod domain;
pub mod logging;
pub mod models;
pub mod services;
