//! Per-vendor dialects: envelope rendering and response parsing.
//!
//! One neutral schema, five dialects. Each vendor module is a stateless
//! strategy selected by `Provider` tag; it renders the tool envelope and
//! forced tool choice, and parses the vendor's response body into the
//! unified `CallResponse`. There is no inheritance hierarchy: a dialect is
//! a value looked up with `adapter`, usable through dynamic dispatch.

pub mod anthropic;
pub mod cohere;
pub mod gemini;
pub mod groq;
pub mod openai;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::response::CallResponse;
use crate::tool::ToolDefinition;

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use gemini::GeminiAdapter;
pub use groq::GroqAdapter;
pub use openai::OpenAiAdapter;

/// Supported vendor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Cohere,
    Groq,
    Gemini,
}

impl Provider {
    /// Canonical lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Cohere => "cohere",
            Provider::Groq => "groq",
            Provider::Gemini => "gemini",
        }
    }

    /// All supported providers, in a stable order.
    pub fn all() -> [Provider; 5] {
        [
            Provider::OpenAI,
            Provider::Anthropic,
            Provider::Cohere,
            Provider::Groq,
            Provider::Gemini,
        ]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "cohere" => Ok(Provider::Cohere),
            "groq" => Ok(Provider::Groq),
            "gemini" => Ok(Provider::Gemini),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Stateless per-vendor strategy.
///
/// Object safe so callers can hold `&dyn ProviderAdapter` and switch vendors
/// at runtime without touching their tool definitions.
pub trait ProviderAdapter: Send + Sync {
    /// The vendor this strategy renders for.
    fn provider(&self) -> Provider;

    /// Render a tool definition in this vendor's envelope.
    fn tool_schema(&self, tool: &ToolDefinition) -> Value;

    /// Render the vendor's forced tool choice for a tool name, when the
    /// vendor has such a knob.
    fn tool_choice(&self, tool_name: &str) -> Option<Value>;

    /// Parse a response body into the unified shape.
    fn parse_response(&self, body: &Value) -> Result<CallResponse>;
}

/// Strategy for a vendor tag.
pub fn adapter(provider: Provider) -> &'static dyn ProviderAdapter {
    match provider {
        Provider::OpenAI => &OpenAiAdapter,
        Provider::Anthropic => &AnthropicAdapter,
        Provider::Cohere => &CohereAdapter,
        Provider::Groq => &GroqAdapter,
        Provider::Gemini => &GeminiAdapter,
    }
}

/// The user instruction for JSON mode: ask for a bare JSON object matching
/// the tool's parameter schema. Every vendor gets the same text.
pub fn json_mode_instruction(tool: &ToolDefinition) -> String {
    let schema = serde_json::to_string_pretty(tool.parameters())
        .unwrap_or_else(|_| tool.parameters().to_string());
    format!(
        "Extract a valid JSON object instance from the content using the following schema:\n\n{}",
        schema
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_ids() {
        assert_eq!(Provider::OpenAI.id(), "openai");
        assert_eq!(Provider::Gemini.to_string(), "gemini");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("anthropic".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert_eq!("Groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert!("mystery".parse::<Provider>().is_err());
    }

    #[test]
    fn test_adapter_round_trip_tags() {
        for provider in Provider::all() {
            assert_eq!(adapter(provider).provider(), provider);
        }
    }

    #[test]
    fn test_json_mode_instruction_embeds_schema() {
        let tool = ToolDefinition::from_signature("lookup(city: str)", None).unwrap();
        let instruction = json_mode_instruction(&tool);
        assert!(instruction.starts_with("Extract a valid JSON object"));
        assert!(instruction.contains("\"city\""));
    }
}
