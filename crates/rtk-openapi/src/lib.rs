//! # RTK OpenAPI Tool Compiler
//!
//! Turns an OpenAPI-style specification into a catalog of callable REST
//! tools: one tool per operation, invoked with a flat argument map and
//! executed through the generic HTTP exchange.
//!
//! ## Features
//!
//! - Parse specifications from strings, files or URLs (JSON and YAML)
//! - One `ToolDefinition` per declared operation, with deterministic
//!   fallback names when `operationId` is absent
//! - JSON-Schema-shaped input descriptions per tool
//! - Request compilation from flat argument maps (path/query/header/body)
//! - Atomic catalog replacement: concurrent invocations never observe a
//!   half-loaded catalog
//!
//! ## Example
//!
//! ```no_run
//! use rtk_openapi::ToolDispatcher;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let dispatcher = ToolDispatcher::new();
//! dispatcher.load_file("./api/openapi.yaml")?;
//!
//! let result = dispatcher.invoke("get_user", json!({"id": "42"})).await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod dispatcher;
pub mod document;
pub mod parser;
pub mod request;
pub mod schema;

// Re-exports
pub use catalog::{BodySpec, ToolCatalog, ToolDefinition};
pub use dispatcher::ToolDispatcher;
pub use document::{ApiDocument, Operation, Parameter, ParameterLocation, PathItem, SchemaNode};
pub use parser::{parse_document, SpecFormat};
pub use request::compile_request;
pub use schema::input_schema;

// Re-export core types
pub use rtk_core::{Error, InvocationResult, Result};
