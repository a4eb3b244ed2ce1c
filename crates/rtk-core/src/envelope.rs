//! Invocation envelopes.
//!
//! Every tool invocation yields exactly one of a success envelope or an error
//! envelope. Failures are observable results, never exceptions crossing the
//! tool-invocation boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Normalized response of a successful tool invocation.
///
/// `data` holds the response body parsed as JSON when possible, the raw text
/// otherwise. Non-2xx statuses are still successes at this level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub data: Value,
}

/// Structured failure returned in place of a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: bool,
    pub message: String,
    pub tool_name: String,
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InvocationResult {
    Success(SuccessEnvelope),
    Failure(ErrorEnvelope),
}

impl InvocationResult {
    pub fn success(status_code: u16, headers: HashMap<String, String>, data: Value) -> Self {
        InvocationResult::Success(SuccessEnvelope {
            status_code,
            headers,
            data,
        })
    }

    pub fn failure(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        InvocationResult::Failure(ErrorEnvelope {
            error: true,
            message: message.into(),
            tool_name: tool_name.into(),
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }
}
