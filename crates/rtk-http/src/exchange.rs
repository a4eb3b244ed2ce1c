//! Generic HTTP exchange executor.
//!
//! All tool invocations funnel through [`HttpExchange::execute`]: one network
//! call per request, no retries, non-2xx statuses returned as normal
//! responses. Only transport-level failures (connection refused, timeout,
//! DNS) surface as errors.

use crate::model::{HttpRequestModel, HttpResponseModel};
use rtk_core::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Reserved query parameter from the legacy wire convention. It signals the
/// transport not to raise on non-2xx; this transport never does, so the pair
/// is stripped before the call and never reaches the remote server.
const NO_THROW_QUERY_PARAM: &str = "throwExceptionOnFailure";

/// Outgoing header names reserved for transport metadata. Entries colliding
/// with these are dropped; callers needing an `Accept` header rely on the
/// transport default.
const TRANSPORT_HEADER_DENYLIST: &[&str] = &[
    "http-method",
    "http-endpoint",
    "http-response-code",
    "http-response-text",
    "accept",
];

/// Response headers retained in the normalized model, by exact name.
const RESPONSE_HEADER_NAMES: &[&str] = &[
    "date",
    "server",
    "location",
    "set-cookie",
    "transfer-encoding",
    "connection",
    "vary",
    "etag",
    "last-modified",
];

/// Response headers retained in the normalized model, by prefix.
const RESPONSE_HEADER_PREFIXES: &[&str] = &["content-", "cache-", "x-"];

fn is_transport_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TRANSPORT_HEADER_DENYLIST.contains(&lower.as_str())
}

fn is_response_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESPONSE_HEADER_NAMES.contains(&lower.as_str())
        || RESPONSE_HEADER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
}

/// Drops the reserved no-throw pair from a compiled URL, leaving every other
/// query pair untouched.
fn strip_reserved_query(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or(pair);
            key != NO_THROW_QUERY_PARAM
        })
        .collect();

    if kept.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, kept.join("&"))
    }
}

/// Executor performing the single generic HTTP call.
///
/// Holds the `reqwest::Client`; callers needing timeouts configure the client
/// they pass to [`HttpExchange::with_client`].
#[derive(Debug, Clone)]
pub struct HttpExchange {
    client: reqwest::Client,
}

impl Default for HttpExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpExchange {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Use a pre-configured client (timeouts, proxies, TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Perform exactly one HTTP call and normalize the response.
    ///
    /// A 404 or 500 comes back as a normal [`HttpResponseModel`]; the
    /// returned headers are filtered to the HTTP-response allowlist.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub async fn execute(&self, request: &HttpRequestModel) -> Result<HttpResponseModel> {
        let method = reqwest::Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::UnsupportedMethod(request.method.clone()))?;

        let url = strip_reserved_query(&request.url);
        debug!("Executing exchange: {} {}", method, url);

        let mut builder = self.client.request(method, &url);

        for (name, value) in &request.headers {
            if is_transport_header(name) {
                debug!("Dropping transport-internal header: {}", name);
                continue;
            }
            builder = builder.header(name, value);
        }

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status_code = response.status().as_u16();

        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter(|(name, _)| is_response_header(name.as_str()))
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let text = response.text().await?;
        let body = if text.is_empty() { None } else { Some(text) };

        debug!("Exchange completed with status {}", status_code);

        Ok(HttpResponseModel {
            status_code,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_reserved_query() {
        assert_eq!(
            strip_reserved_query("http://h/p?a=1&throwExceptionOnFailure=false&b=2"),
            "http://h/p?a=1&b=2"
        );
        assert_eq!(
            strip_reserved_query("http://h/p?throwExceptionOnFailure=false"),
            "http://h/p"
        );
        assert_eq!(strip_reserved_query("http://h/p?a=1"), "http://h/p?a=1");
        assert_eq!(strip_reserved_query("http://h/p"), "http://h/p");
    }

    #[test]
    fn test_header_classification() {
        assert!(is_response_header("Content-Type"));
        assert!(is_response_header("cache-control"));
        assert!(is_response_header("X-Request-Id"));
        assert!(is_response_header("ETag"));
        assert!(!is_response_header("breadcrumb"));
        assert!(!is_response_header("age"));

        assert!(is_transport_header("Accept"));
        assert!(is_transport_header("http-response-code"));
        assert!(!is_transport_header("Authorization"));
    }

    #[tokio::test]
    async fn test_non_2xx_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let exchange = HttpExchange::new();
        let request = HttpRequestModel::new("GET", format!("{}/missing", server.url()));
        let response = exchange.execute(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body.as_deref(), Some("not found"));
    }

    #[tokio::test]
    async fn test_response_headers_are_filtered() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/headers")
            .with_status(200)
            .with_header("Content-Type", "application/json")
            .with_header("breadcrumb", "internal-marker")
            .with_body("{}")
            .create_async()
            .await;

        let exchange = HttpExchange::new();
        let request = HttpRequestModel::new("GET", format!("{}/headers", server.url()));
        let response = exchange.execute(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert!(!response.headers.contains_key("breadcrumb"));
    }

    #[tokio::test]
    async fn test_transport_headers_are_not_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/echo")
            .match_header("accept", mockito::Matcher::Missing)
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .create_async()
            .await;

        let exchange = HttpExchange::new();
        let request = HttpRequestModel::new("GET", format!("{}/echo", server.url()))
            .with_header("Accept", "application/xml")
            .with_header("Authorization", "Bearer token");
        let response = exchange.execute(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_reserved_query_pair_never_reaches_the_wire() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_query(mockito::Matcher::Missing)
            .with_status(200)
            .create_async()
            .await;

        let exchange = HttpExchange::new();
        let request = HttpRequestModel::new(
            "GET",
            format!("{}/ping?throwExceptionOnFailure=false", server.url()),
        );
        exchange.execute(&request).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let exchange = HttpExchange::new();
        let request = HttpRequestModel::new("FR OB", "http://localhost/ignored");
        let err = exchange.execute(&request).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(_)));
    }
}
