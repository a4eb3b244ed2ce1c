//! Request compiler.
//!
//! Compiles a tool definition plus a flat runtime argument map into one
//! concrete [`HttpRequestModel`]: path substitution, parameter location
//! classification, body extraction and URL composition.

use crate::catalog::ToolDefinition;
use crate::document::{ParameterLocation, HTTP_METHODS};
use crate::schema::path_placeholders;
use rtk_core::{Error, Result};
use rtk_http::HttpRequestModel;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};
use url::form_urlencoded;

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compile one invocation into a concrete HTTP request.
///
/// Path placeholders with no matching argument stay unresolved in the URL
/// and surface downstream as a malformed-URL failure; that is deliberate,
/// this layer does not enforce requiredness. Query values are
/// percent-encoded.
#[instrument(skip(tool, arguments), fields(tool = %tool.tool_name))]
pub fn compile_request(
    tool: &ToolDefinition,
    arguments: &Map<String, Value>,
) -> Result<HttpRequestModel> {
    let method = tool.method.to_ascii_uppercase();
    if !HTTP_METHODS.contains(&method.as_str()) {
        return Err(Error::UnsupportedMethod(tool.method.clone()));
    }

    let mut consumed: HashSet<String> = HashSet::new();

    // 1. path substitution
    let mut path = tool.path_template.clone();
    for name in path_placeholders(&tool.path_template) {
        if let Some(value) = arguments.get(&name).filter(|v| !v.is_null()) {
            path = path.replace(&format!("{{{}}}", name), &value_to_string(value));
            consumed.insert(name);
        }
    }

    // 2. parameter classification
    let mut query: Vec<(String, String)> = Vec::new();
    let mut headers: HashMap<String, String> = HashMap::new();
    for parameter in &tool.parameters {
        let Some(value) = arguments.get(&parameter.name).filter(|v| !v.is_null()) else {
            continue;
        };
        match parameter.location {
            ParameterLocation::Path => {
                // consumed by substitution above, never re-emitted
                consumed.insert(parameter.name.clone());
            }
            ParameterLocation::Query => {
                query.push((parameter.name.clone(), value_to_string(value)));
                consumed.insert(parameter.name.clone());
            }
            ParameterLocation::Header => {
                headers.insert(parameter.name.clone(), value_to_string(value));
                consumed.insert(parameter.name.clone());
            }
            ParameterLocation::Cookie => {
                debug!("Cookie parameters are not supported: {}", parameter.name);
                consumed.insert(parameter.name.clone());
            }
        }
    }

    // 3. body extraction
    let mut body: Option<String> = None;
    if tool.has_request_body() {
        if let Some(explicit) = arguments.get("body").filter(|v| !v.is_null()) {
            body = Some(match explicit {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        } else {
            // tolerate callers passing body fields as top-level arguments
            let implicit: Map<String, Value> = arguments
                .iter()
                .filter(|(name, value)| {
                    !consumed.contains(*name) && *name != "body" && !value.is_null()
                })
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            if !implicit.is_empty() {
                body = Some(Value::Object(implicit).to_string());
            }
        }
    }

    // 4. URL composition
    let mut url = format!("{}{}", tool.base_url, path);
    if !query.is_empty() {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        url.push('?');
        url.push_str(&encoded);
    }

    debug!("Compiled request: {} {}", method, url);

    let mut request = HttpRequestModel::new(method, url);
    request.headers = headers;
    request.body = body;
    Ok(request)
}
