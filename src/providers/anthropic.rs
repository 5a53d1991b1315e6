//! Anthropic dialect.
//!
//! Tools are flat objects with an `input_schema`; there is no `function`
//! wrapper. Responses carry typed content blocks, with tool calls as
//! `tool_use` blocks whose `input` is a JSON object rather than an encoded
//! string. Stop reasons are normalized: `end_turn` becomes `stop`,
//! `max_tokens` becomes `length`, `tool_use` becomes `tool_calls`.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::providers::{Provider, ProviderAdapter};
use crate::response::{CallResponse, Usage};
use crate::tool::{ToolCallRequest, ToolDefinition};

pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn tool_schema(&self, tool: &ToolDefinition) -> Value {
        let mut envelope = Map::new();
        envelope.insert("description".into(), json!(tool.description()));
        // input_schema is required even for no-argument tools.
        envelope.insert("input_schema".into(), tool.parameters().clone());
        envelope.insert("name".into(), json!(tool.name()));
        envelope.into()
    }

    fn tool_choice(&self, tool_name: &str) -> Option<Value> {
        Some(json!({
            "name": tool_name,
            "type": "tool",
        }))
    }

    fn parse_response(&self, body: &Value) -> Result<CallResponse> {
        let blocks = body
            .get("content")
            .and_then(|c| c.as_array())
            .cloned()
            .unwrap_or_default();

        let content = blocks
            .iter()
            .find(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .and_then(|b| b.get("text"))
            .and_then(|t| t.as_str())
            .map(String::from);

        // Normalize stop_reason -> finish_reason
        let finish_reason = body
            .get("stop_reason")
            .and_then(|v| v.as_str())
            .map(|r| match r {
                "end_turn" | "stop_sequence" => "stop".to_string(),
                "max_tokens" => "length".to_string(),
                "tool_use" => "tool_calls".to_string(),
                other => other.to_lowercase(),
            });

        let usage = body.get("usage").map(|u| Usage {
            input_tokens: u["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: u["output_tokens"].as_u64().unwrap_or(0),
        });

        let tool_calls = blocks
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("tool_use"))
            .filter_map(|b| {
                let name = b.get("name")?.as_str()?;
                // input is an object; re-encode so raw_arguments stays a
                // uniform JSON string across vendors.
                let input = b.get("input").cloned().unwrap_or_else(|| json!({}));
                let mut request = ToolCallRequest::new(name, input.to_string());
                if let Some(id) = b.get("id").and_then(|v| v.as_str()) {
                    request = request.with_id(id);
                }
                Some(request)
            })
            .collect();

        Ok(CallResponse {
            provider: Provider::Anthropic,
            content,
            finish_reason,
            usage,
            tool_calls,
            raw: body.clone(),
            json_mode: false,
        })
    }
}
