//! Tool dispatcher.
//!
//! Holds the current catalog behind an atomically swapped snapshot and
//! exposes the single generic `invoke` entry point. Invocation failures are
//! always observable results; nothing escapes this boundary as an error.

use crate::catalog::ToolCatalog;
use crate::document::ApiDocument;
use crate::request::compile_request;
use crate::schema::input_schema;
use rtk_core::{Error, InvocationResult, Result};
use rtk_http::HttpExchange;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{error, info, instrument, warn};

/// Maps tool names to definitions and dispatches invocations.
///
/// The catalog slot is replaced wholesale on every load: concurrent
/// invocations observe either the previous or the new catalog in full,
/// never a partial mix.
pub struct ToolDispatcher {
    catalog: RwLock<Option<Arc<ToolCatalog>>>,
    exchange: HttpExchange,
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(None),
            exchange: HttpExchange::new(),
        }
    }

    /// Use a pre-configured `reqwest::Client` for all exchanges (timeouts,
    /// proxies, TLS settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            catalog: RwLock::new(None),
            exchange: HttpExchange::with_client(client),
        }
    }

    /// Build a catalog from a normalized document and swap it in. Returns
    /// the number of tools. On failure the previous catalog stays intact.
    pub fn load_document(&self, document: &ApiDocument) -> Result<usize> {
        let catalog = ToolCatalog::from_document(document)?;
        let count = catalog.len();
        self.store(Some(Arc::new(catalog)));
        info!("Loaded catalog with {} tools", count);
        Ok(count)
    }

    /// Parse raw JSON/YAML content and load it.
    pub fn load_str(&self, content: &str) -> Result<usize> {
        let document = ApiDocument::from_str(content)?;
        self.load_document(&document)
    }

    /// Load a specification file, choosing the format by extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let document = ApiDocument::from_file(path)?;
        self.load_document(&document)
    }

    /// Fetch a specification from a URL and load it.
    pub async fn load_url(&self, url: &str) -> Result<usize> {
        let document = ApiDocument::from_url(url).await?;
        self.load_document(&document)
    }

    /// Drop the current catalog.
    pub fn clear(&self) {
        self.store(None);
        info!("Cleared tool catalog");
    }

    /// Snapshot of the current catalog for concurrent readers.
    pub fn catalog(&self) -> Option<Arc<ToolCatalog>> {
        self.catalog
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store(&self, catalog: Option<Arc<ToolCatalog>>) {
        let mut slot = self
            .catalog
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = catalog;
    }

    /// All tools of the current catalog as `name -> "METHOD path - desc"`.
    pub fn list_tools(&self) -> BTreeMap<String, String> {
        let Some(catalog) = self.catalog() else {
            return BTreeMap::new();
        };
        catalog
            .iter()
            .map(|(name, tool)| {
                (
                    name.clone(),
                    format!(
                        "{} {} - {}",
                        tool.method, tool.path_template, tool.description
                    ),
                )
            })
            .collect()
    }

    /// Full details of one tool, including its synthesized input schema.
    pub fn tool_details(&self, tool_name: &str) -> Option<Value> {
        let catalog = self.catalog()?;
        let tool = catalog.get(tool_name)?;
        let parameters: Vec<Value> = tool
            .parameters
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "type": p.effective_type(),
                    "location": p.location.to_string(),
                    "required": p.required,
                    "description": p.description,
                })
            })
            .collect();

        Some(json!({
            "toolName": tool.tool_name,
            "method": tool.method,
            "path": tool.path_template,
            "baseUrl": tool.base_url,
            "description": tool.description,
            "hasRequestBody": tool.has_request_body(),
            "parameters": parameters,
            "inputSchema": input_schema(tool),
        }))
    }

    /// Invoke one tool with a flat argument map.
    ///
    /// Always yields exactly one envelope: a success envelope with the
    /// normalized response (any status code), or an error envelope naming
    /// the tool. Never panics and never returns `Err`.
    #[instrument(skip(self, arguments), fields(tool = %tool_name))]
    pub async fn invoke(&self, tool_name: &str, arguments: Value) -> InvocationResult {
        let Some(catalog) = self.catalog() else {
            warn!("Invocation before any catalog load");
            return InvocationResult::failure(tool_name, Error::CatalogNotLoaded.to_string());
        };
        let Some(tool) = catalog.get(tool_name) else {
            warn!("Unknown tool: {}", tool_name);
            return InvocationResult::failure(
                tool_name,
                Error::ToolNotFound(tool_name.to_string()).to_string(),
            );
        };

        let arguments: Map<String, Value> = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return InvocationResult::failure(
                    tool_name,
                    format!("Expected an object of arguments, got: {}", other),
                );
            }
        };

        let request = match compile_request(tool, &arguments) {
            Ok(request) => request,
            Err(e) => {
                error!("Failed to compile request for '{}': {}", tool_name, e);
                return InvocationResult::failure(tool_name, e.to_string());
            }
        };

        match self.exchange.execute(&request).await {
            Ok(response) => {
                let data = match response.body {
                    None => Value::Null,
                    Some(text) => serde_json::from_str(&text)
                        .unwrap_or_else(|_| Value::String(text)),
                };
                InvocationResult::success(response.status_code, response.headers, data)
            }
            Err(e) => {
                error!("Exchange failed for '{}': {}", tool_name, e);
                InvocationResult::failure(tool_name, e.to_string())
            }
        }
    }
}
