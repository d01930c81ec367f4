//! # Domain Module
//!
//! Envelope construction and the build → sign → submit pipeline.

mod envelope;
pub use envelope::*;

mod pipeline;
pub use pipeline::*;
