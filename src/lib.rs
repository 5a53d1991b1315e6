//! # mirascope
//!
//! Tool schema conversion and tool-call round-tripping for LLM provider
//! APIs.
//!
//! Five vendor families (OpenAI, Anthropic, Cohere, Groq, Gemini) all speak
//! a variation of the same idea: describe a tool as a JSON schema, receive a
//! tool call back as a name plus JSON-encoded arguments. This crate owns
//! that round trip:
//!
//! - one vendor-neutral schema builder fed by three tool sources (parsed
//!   function signatures, explicit struct specs, Rust types deriving
//!   [`schemars::JsonSchema`]),
//! - per-vendor envelope renderers selected by [`Provider`] tag,
//! - parsing and validation of vendor tool calls back into typed,
//!   invokable [`ToolInstance`]s.
//!
//! ## Quick start
//!
//! ```
//! use mirascope::{Provider, ToolCallRequest, ToolDefinition};
//!
//! fn main() -> mirascope::Result<()> {
//!     let lookup = ToolDefinition::from_signature(
//!         r#"lookup(city: str, units: str = "metric") -> str"#,
//!         Some("Lookup current weather for a city."),
//!     )?;
//!
//!     // Outbound: render the vendor's envelope.
//!     let schema = lookup.provider_schema(Provider::OpenAI);
//!     assert_eq!(schema["function"]["parameters"]["required"][0], "city");
//!
//!     // Inbound: parse and validate the vendor's tool call.
//!     let request = ToolCallRequest::new("lookup", r#"{"city": "Tokyo"}"#);
//!     let instance = lookup.instantiate(&request)?;
//!     assert_eq!(instance.resolved("units"), Some(&serde_json::json!("metric")));
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`schema`] | Neutral schema construction from all tool sources, argument validation |
//! | [`tool`] | [`ToolDefinition`], [`ToolCallRequest`], [`ToolInstance`] |
//! | [`providers`] | Vendor envelope dialects and response parsers |
//! | [`response`] | Unified [`CallResponse`] with tool extraction |
//! | [`streaming`] | Folding streamed tool-call deltas into complete requests |
//! | [`cost`] | Static pricing tables and cost estimation |
//! | [`rag`] | Document chunking and embedder/vector-store traits (feature `rag`) |
//!
//! Conversion and validation are pure and stateless; definitions are cheap
//! to clone and safe to share across tasks.

pub mod cost;
pub mod error;
pub mod providers;
pub mod response;
pub mod schema;
pub mod streaming;
pub mod tool;

#[cfg(feature = "rag")]
pub mod rag;

pub use error::{Error, Result};
pub use providers::{Provider, ProviderAdapter};
pub use response::{CallResponse, Usage};
pub use tool::{ToolCallRequest, ToolDefinition, ToolInstance};
