//! Tool definitions and the call round trip.
//!
//! A `ToolDefinition` is built once from any source (signature string,
//! struct spec, deriving Rust type, wrapped primitive), rendered into any
//! vendor's dialect with `provider_schema`, and turned back into a validated
//! `ToolInstance` when a vendor call comes in.
//!
//! # Examples
//!
//! ```
//! use mirascope::tool::{ToolCallRequest, ToolDefinition};
//! use mirascope::providers::Provider;
//!
//! let tool = ToolDefinition::from_signature(
//!     r#"lookup(city: str, units: str = "metric") -> str"#,
//!     Some("Lookup current weather for a city."),
//! ).unwrap();
//!
//! let envelope = tool.provider_schema(Provider::OpenAI);
//! assert_eq!(envelope["function"]["name"], "lookup");
//!
//! let request = ToolCallRequest::new("lookup", r#"{"city": "Reykjavik"}"#);
//! let instance = tool.instantiate(&request).unwrap();
//! assert_eq!(instance.resolved("units"), Some(&serde_json::json!("metric")));
//! ```

pub mod call;
pub mod definition;

// Re-export commonly used types
pub use call::{ToolCallRequest, ToolInstance};
pub use definition::{ToolDefinition, ToolHandler};
