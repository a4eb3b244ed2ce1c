//! Specification normalizer.
//!
//! Parses raw JSON or YAML content into an [`ApiDocument`], validates that
//! the document carries an `info.title`, and substitutes component schema
//! references inline so downstream code never sees a `$ref`.

use crate::document::{ApiDocument, SchemaNode};
use indexmap::IndexMap;
use rtk_core::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

const COMPONENT_REF_PREFIX: &str = "#/components/schemas/";

/// Raw document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Choose the format from a file extension: `.yaml`/`.yml` parse as
    /// YAML, everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SpecFormat::Yaml
            }
            _ => SpecFormat::Json,
        }
    }
}

/// Parse and normalize one specification document.
///
/// Fails with [`Error::Parse`] when the content is not parseable in the
/// chosen format, [`Error::InvalidDocument`] when `info.title` is missing,
/// and [`Error::UnresolvedRef`] for a `$ref` that does not point at a known
/// component schema.
pub fn parse_document(content: &str, format: SpecFormat) -> Result<ApiDocument> {
    let mut document: ApiDocument = match format {
        SpecFormat::Json => {
            serde_json::from_str(content).map_err(|e| Error::Parse(e.to_string()))?
        }
        SpecFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?
        }
    };

    validate(&document)?;
    resolve_document_refs(&mut document)?;

    info!(
        "Normalized document '{}' with {} paths",
        document.info.title,
        document.paths.len()
    );
    Ok(document)
}

impl ApiDocument {
    /// Parse from raw content, sniffing the format: JSON first, YAML as the
    /// fallback.
    pub fn from_str(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            return parse_document(content, SpecFormat::Json);
        }
        match parse_document(content, SpecFormat::Json) {
            Ok(document) => Ok(document),
            Err(_) => parse_document(content, SpecFormat::Yaml),
        }
    }

    /// Load from a file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading specification from file: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        parse_document(&content, SpecFormat::from_path(path))
    }

    /// Fetch from a URL and parse, sniffing the format.
    pub async fn from_url(url: &str) -> Result<Self> {
        debug!("Loading specification from URL: {}", url);
        let content = reqwest::get(url).await?.text().await?;
        Self::from_str(&content)
    }
}

/// A document without `info.title` is never valid for catalog construction.
fn validate(document: &ApiDocument) -> Result<()> {
    if document.info.title.trim().is_empty() {
        return Err(Error::invalid_document("missing info.title"));
    }
    Ok(())
}

/// Substitute every `#/components/schemas/<Name>` reference inline, in the
/// component schemas themselves and in all parameter and request-body
/// schemas.
fn resolve_document_refs(document: &mut ApiDocument) -> Result<()> {
    let library = document.components.schemas.clone();

    for (name, schema) in document.components.schemas.iter_mut() {
        let mut stack = vec![name.clone()];
        resolve_schema(schema, &library, &mut stack)?;
    }

    for path_item in document.paths.values_mut() {
        for operation in path_item.operations_mut() {
            for parameter in &mut operation.parameters {
                if let Some(schema) = &mut parameter.schema {
                    resolve_schema(schema, &library, &mut Vec::new())?;
                }
            }
            if let Some(body) = &mut operation.request_body {
                for media in body.content.values_mut() {
                    if let Some(schema) = &mut media.schema {
                        resolve_schema(schema, &library, &mut Vec::new())?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Replace a `$ref` node with a copy of the referenced component schema.
/// A component already on the expansion stack marks a cycle; the inner
/// occurrence keeps its `$ref` unexpanded.
fn resolve_schema(
    node: &mut SchemaNode,
    library: &IndexMap<String, SchemaNode>,
    stack: &mut Vec<String>,
) -> Result<()> {
    if let Some(ref_path) = node.ref_path.clone() {
        let name = ref_path
            .strip_prefix(COMPONENT_REF_PREFIX)
            .ok_or_else(|| Error::UnresolvedRef(ref_path.clone()))?;
        let target = library
            .get(name)
            .ok_or_else(|| Error::UnresolvedRef(ref_path.clone()))?;

        if stack.iter().any(|seen| seen == name) {
            debug!("Cyclic schema reference left unexpanded: {}", ref_path);
            return Ok(());
        }

        let mut resolved = target.clone();
        stack.push(name.to_string());
        resolve_schema(&mut resolved, library, stack)?;
        stack.pop();
        *node = resolved;
        return Ok(());
    }

    for child in node.properties.values_mut() {
        resolve_schema(child, library, stack)?;
    }
    if let Some(items) = &mut node.items {
        resolve_schema(items, library, stack)?;
    }
    Ok(())
}
