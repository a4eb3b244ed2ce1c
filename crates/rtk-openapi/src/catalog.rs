//! Operation catalog.
//!
//! Walks a normalized document and derives one [`ToolDefinition`] per
//! declared operation. The catalog is immutable once built; reloading a
//! specification replaces it wholesale.

use crate::document::{ApiDocument, Operation, Parameter, SchemaNode};
use indexmap::IndexMap;
use rtk_core::{Error, Result};
use tracing::{debug, info, warn};

/// Request-body shape selected for one operation: the JSON media type when
/// declared, else the first media type carrying a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub required: bool,
    pub media_type: Option<String>,
    pub schema: Option<SchemaNode>,
}

/// One callable tool derived from one operation. Read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub tool_name: String,
    /// Uppercase HTTP verb
    pub method: String,
    pub path_template: String,
    pub base_url: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<BodySpec>,
}

impl ToolDefinition {
    pub fn has_request_body(&self) -> bool {
        self.request_body.is_some()
    }
}

/// The full set of tools derived from one document, keyed by tool name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCatalog {
    pub title: String,
    pub version: String,
    tools: IndexMap<String, ToolDefinition>,
}

impl ToolCatalog {
    /// Build the catalog for a normalized document.
    ///
    /// Duplicate tool names follow a last-write-wins policy: the later
    /// operation in document order overwrites the earlier one.
    pub fn from_document(document: &ApiDocument) -> Result<Self> {
        if document.info.title.trim().is_empty() {
            return Err(Error::invalid_document("missing info.title"));
        }

        let base_url = document.base_url();
        let mut tools: IndexMap<String, ToolDefinition> = IndexMap::new();

        for (path, path_item) in &document.paths {
            for (method, operation) in path_item.operations() {
                let definition = build_definition(method, path, base_url, operation);
                debug!(
                    "Cataloged tool {} [{} {}]",
                    definition.tool_name, method, path
                );
                if let Some(previous) = tools.insert(definition.tool_name.clone(), definition) {
                    warn!(
                        "Duplicate tool name '{}', replacing {} {}",
                        previous.tool_name, previous.method, previous.path_template
                    );
                }
            }
        }

        info!(
            "Built catalog '{}' with {} tools",
            document.info.title,
            tools.len()
        );

        Ok(Self {
            title: document.info.title.clone(),
            version: document.info.version.clone(),
            tools,
        })
    }

    pub fn get(&self, tool_name: &str) -> Option<&ToolDefinition> {
        self.tools.get(tool_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ToolDefinition)> {
        self.tools.iter()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn build_definition(
    method: &str,
    path: &str,
    base_url: &str,
    operation: &Operation,
) -> ToolDefinition {
    let tool_name = operation
        .operation_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_tool_name(method, path));

    let description = operation
        .description
        .as_deref()
        .or(operation.summary.as_deref())
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", method, path));

    ToolDefinition {
        tool_name,
        method: method.to_string(),
        path_template: path.to_string(),
        base_url: base_url.to_string(),
        description,
        parameters: operation.parameters.clone(),
        request_body: operation.request_body.as_ref().map(|body| {
            let media = body
                .content
                .get("application/json")
                .map(|m| ("application/json", m))
                .or_else(|| {
                    body.content
                        .iter()
                        .find(|(_, m)| m.schema.is_some())
                        .map(|(k, m)| (k.as_str(), m))
                });
            BodySpec {
                required: body.required,
                media_type: media.map(|(name, _)| name.to_string()),
                schema: media.and_then(|(_, m)| m.schema.clone()),
            }
        }),
    }
}

/// Deterministic tool name for operations without an `operationId`:
/// `lower(method) + "_" + sanitized path`, where every non-alphanumeric run
/// in the path collapses to a single underscore.
///
/// Placeholder names are kept (`GET /pets/{id}` -> `get_pets_id`) so two
/// distinct paths on the same method stay distinct.
pub fn fallback_tool_name(method: &str, path: &str) -> String {
    let sanitized = sanitize_path(path);
    if sanitized.is_empty() {
        method.to_lowercase()
    } else {
        format!("{}_{}", method.to_lowercase(), sanitized)
    }
}

fn sanitize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut pending_separator = false;
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }
    out
}
