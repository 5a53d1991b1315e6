//! Groq dialect.
//!
//! Groq exposes the chat-completions format, so the envelope and response
//! shapes match OpenAI; only the provider tag (and pricing) differ.

use serde_json::{json, Value};

use crate::error::Result;
use crate::providers::openai::{function_body, parse_chat_completion};
use crate::providers::{Provider, ProviderAdapter};
use crate::response::CallResponse;
use crate::tool::ToolDefinition;

pub struct GroqAdapter;

impl ProviderAdapter for GroqAdapter {
    fn provider(&self) -> Provider {
        Provider::Groq
    }

    fn tool_schema(&self, tool: &ToolDefinition) -> Value {
        json!({
            "function": function_body(tool),
            "type": "function",
        })
    }

    fn tool_choice(&self, tool_name: &str) -> Option<Value> {
        Some(json!({
            "function": {"name": tool_name},
            "type": "function",
        }))
    }

    fn parse_response(&self, body: &Value) -> Result<CallResponse> {
        parse_chat_completion(Provider::Groq, body)
    }
}
