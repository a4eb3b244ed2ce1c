//! Core types for RTK
//!
//! This crate provides the shared foundations of the toolkit: the error type
//! used across all crates and the invocation envelopes returned to callers of
//! generated tools.

pub mod envelope;
pub mod error;

// Re-exports
pub use envelope::{ErrorEnvelope, InvocationResult, SuccessEnvelope};
pub use error::{Error, Result};
