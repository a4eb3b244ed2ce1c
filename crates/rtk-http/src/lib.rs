//! Generic HTTP exchange for RTK
//!
//! This crate is the single funnel every tool invocation passes through. It
//! defines the transport-neutral request/response models and the executor
//! that performs exactly one HTTP call per request, returning non-2xx
//! statuses as normal responses rather than errors.

pub mod exchange;
pub mod model;

// Re-exports
pub use exchange::HttpExchange;
pub use model::{HttpRequestModel, HttpResponseModel};
