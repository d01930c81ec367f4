//! Property-based tests.

mod amount;
