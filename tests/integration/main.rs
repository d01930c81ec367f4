//! Integration tests exercising the full pipeline against a mock Horizon.

mod pipeline;
