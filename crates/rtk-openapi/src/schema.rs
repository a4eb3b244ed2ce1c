//! Input schema synthesizer.
//!
//! Produces the JSON-Schema-shaped description of a tool's callable inputs:
//! path template variables, declared parameters by location, and a `body`
//! property when the operation declares a request body.

use crate::catalog::{BodySpec, ToolDefinition};
use crate::document::ParameterLocation;
use serde_json::{json, Map, Value};

/// Extract `{name}` placeholders from a path template with a single
/// left-to-right scan. Order of first appearance, duplicates dropped.
pub(crate) fn path_placeholders(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        if c != '{' {
            continue;
        }
        let mut name = String::new();
        for inner in chars.by_ref() {
            if inner == '}' {
                break;
            }
            name.push(inner);
        }
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Synthesize the input schema for one tool.
///
/// Pure: the same definition always yields an identical schema value. Path
/// placeholders are required strings unless a declared `path` parameter of
/// the same name supplies its own type or description — declared metadata
/// wins. `body` mirrors the resolved JSON request-body schema one level
/// deep, or stays an untyped object for non-JSON bodies.
pub fn input_schema(tool: &ToolDefinition) -> Value {
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for name in path_placeholders(&tool.path_template) {
        let declared = tool
            .parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Path && p.name == name);

        let mut property = Map::new();
        match declared {
            Some(parameter) => {
                property.insert("type".into(), json!(parameter.effective_type()));
                let description = parameter
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| format!("Path parameter: {}", name));
                property.insert("description".into(), json!(description));
                if let Some(schema) = &parameter.schema {
                    if !schema.enum_values.is_empty() {
                        property.insert("enum".into(), json!(schema.enum_values));
                    }
                }
            }
            None => {
                property.insert("type".into(), json!("string"));
                property.insert(
                    "description".into(),
                    json!(format!("Path parameter: {}", name)),
                );
            }
        }

        properties.insert(name.clone(), Value::Object(property));
        required.push(name);
    }

    for parameter in &tool.parameters {
        if properties.contains_key(&parameter.name) {
            continue;
        }

        let mut property = Map::new();
        property.insert("type".into(), json!(parameter.effective_type()));
        if let Some(description) = parameter
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            property.insert("description".into(), json!(description));
        }
        if let Some(schema) = &parameter.schema {
            if !schema.enum_values.is_empty() {
                property.insert("enum".into(), json!(schema.enum_values));
            }
        }

        properties.insert(parameter.name.clone(), Value::Object(property));
        if parameter.required {
            required.push(parameter.name.clone());
        }
    }

    if let Some(body) = &tool.request_body {
        properties.insert("body".into(), body_schema(body));
        if body.required {
            required.push("body".into());
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn body_schema(body: &BodySpec) -> Value {
    let is_json = body
        .media_type
        .as_deref()
        .map(|media| media.contains("json"))
        .unwrap_or(false);

    if let (true, Some(schema)) = (is_json, body.schema.as_ref()) {
        let mut properties = Map::new();
        for (name, node) in &schema.properties {
            let mut property = Map::new();
            property.insert("type".into(), json!(node.effective_type()));
            if let Some(description) = &node.description {
                property.insert("description".into(), json!(description));
            }
            properties.insert(name.clone(), Value::Object(property));
        }
        let mut out = Map::new();
        out.insert("type".into(), json!("object"));
        if !properties.is_empty() {
            out.insert("properties".into(), Value::Object(properties));
        }
        if !schema.required.is_empty() {
            out.insert("required".into(), json!(schema.required));
        }
        return Value::Object(out);
    }

    json!({"type": "object"})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;
    use crate::document::ApiDocument;

    fn tool_from(spec: &str, name: &str) -> ToolDefinition {
        let doc = ApiDocument::from_str(spec).unwrap();
        ToolCatalog::from_document(&doc)
            .unwrap()
            .get(name)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_path_placeholders_scan() {
        assert_eq!(
            path_placeholders("/users/{userId}/posts/{postId}"),
            vec!["userId", "postId"]
        );
        assert!(path_placeholders("/users").is_empty());
        assert_eq!(path_placeholders("/a/{x}/b/{x}"), vec!["x"]);
    }

    #[test]
    fn test_placeholders_become_required_strings() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/pets/{id}":{"get":{"operationId":"getPet"}}}}"#,
            "getPet",
        );
        let schema = input_schema(&tool);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["id"]["type"], "string");
        assert_eq!(
            schema["properties"]["id"]["description"],
            "Path parameter: id"
        );
        assert_eq!(schema["required"], serde_json::json!(["id"]));
    }

    #[test]
    fn test_declared_metadata_wins_over_placeholder_default() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/pets/{id}":{"get":{"operationId":"getPet",
                    "parameters":[{"name":"id","in":"path","required":true,
                        "description":"Numeric pet id",
                        "schema":{"type":"integer"}}]}}}}"#,
            "getPet",
        );
        let schema = input_schema(&tool);

        assert_eq!(schema["properties"]["id"]["type"], "integer");
        assert_eq!(schema["properties"]["id"]["description"], "Numeric pet id");
        assert_eq!(schema["required"], serde_json::json!(["id"]));
    }

    #[test]
    fn test_declared_parameters_and_requiredness() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/pets":{"get":{"operationId":"listPets",
                    "parameters":[
                        {"name":"limit","in":"query","schema":{"type":"integer"}},
                        {"name":"Authorization","in":"header","required":true,
                         "schema":{"type":"string"}}
                    ]}}}}"#,
            "listPets",
        );
        let schema = input_schema(&tool);

        assert_eq!(schema["properties"]["limit"]["type"], "integer");
        assert_eq!(schema["properties"]["Authorization"]["type"], "string");
        assert_eq!(schema["required"], serde_json::json!(["Authorization"]));
    }

    #[test]
    fn test_json_body_copies_nested_detail() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/pets":{"post":{"operationId":"createPet",
                    "requestBody":{"required":true,"content":{
                        "application/json":{"schema":{
                            "type":"object",
                            "properties":{
                                "name":{"type":"string","description":"Pet name"},
                                "age":{"type":"integer"}},
                            "required":["name"]}}}}}}}}"#,
            "createPet",
        );
        let schema = input_schema(&tool);

        let body = &schema["properties"]["body"];
        assert_eq!(body["type"], "object");
        assert_eq!(body["properties"]["name"]["type"], "string");
        assert_eq!(body["properties"]["name"]["description"], "Pet name");
        assert_eq!(body["properties"]["age"]["type"], "integer");
        assert_eq!(body["required"], serde_json::json!(["name"]));
        assert!(schema["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("body")));
    }

    #[test]
    fn test_non_json_body_is_untyped_object() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/upload":{"post":{"operationId":"upload",
                    "requestBody":{"content":{
                        "text/plain":{"schema":{"type":"string"}}}}}}}}"#,
            "upload",
        );
        let schema = input_schema(&tool);

        assert_eq!(
            schema["properties"]["body"],
            serde_json::json!({"type": "object"})
        );
        assert!(!schema["required"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("body")));
    }

    #[test]
    fn test_schema_is_stable_across_calls() {
        let tool = tool_from(
            r#"{"openapi":"3.0.0","info":{"title":"T","version":"1"},
                "paths":{"/pets/{id}":{"get":{"operationId":"getPet",
                    "parameters":[{"name":"verbose","in":"query",
                        "schema":{"type":"boolean"}}]}}}}"#,
            "getPet",
        );
        assert_eq!(input_schema(&tool), input_schema(&tool));
    }
}
