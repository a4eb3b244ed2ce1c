//! Transport-neutral request and response models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One outgoing HTTP request, fully resolved.
///
/// `url` already contains the substituted path and the query string; `headers`
/// carries only application headers (transport-internal names are dropped by
/// the executor).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpRequestModel {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: String,
    /// Fully resolved URL, including any query string
    pub url: String,
    /// Outgoing headers; insertion order is irrelevant
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Raw request body, if any
    #[serde(default)]
    pub body: Option<String>,
}

impl HttpRequestModel {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// One normalized HTTP response.
///
/// A 4xx/5xx status is a normal value here; headers are already filtered to
/// the HTTP-response allowlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpResponseModel {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl Default for HttpResponseModel {
    /// A response with no transport-provided status defaults to 200.
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: HashMap::new(),
            body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequestModel::new("POST", "https://api.example.com/users")
            .with_header("Authorization", "Bearer token")
            .with_body(r#"{"name":"ada"}"#);

        assert_eq!(request.method, "POST");
        assert_eq!(request.headers.get("Authorization").unwrap(), "Bearer token");
        assert!(request.body.is_some());
    }

    #[test]
    fn test_response_default_status() {
        let response = HttpResponseModel::default();
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_none());
    }
}
