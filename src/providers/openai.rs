//! OpenAI dialect.
//!
//! Tools ride as `{"type": "function", "function": {...}}` with `parameters`
//! omitted for no-argument tools. Responses report calls under
//! `choices[0].message.tool_calls` with the arguments already JSON-encoded
//! as a string.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::providers::{Provider, ProviderAdapter};
use crate::response::{CallResponse, Usage};
use crate::tool::{ToolCallRequest, ToolDefinition};

pub struct OpenAiAdapter;

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> Provider {
        Provider::OpenAI
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
        parse_chat_completion(Provider::OpenAI, body)
    }
}

/// The inner function object. Shared with the Groq dialect, which follows
/// the chat-completions format exactly.
pub(crate) fn function_body(tool: &ToolDefinition) -> Value {
    let mut function = Map::new();
    function.insert("description".into(), json!(tool.description()));
    function.insert("name".into(), json!(tool.name()));
    if tool.has_parameters() {
        function.insert("parameters".into(), tool.parameters().clone());
    }
    function.into()
}

/// Parse a chat-completions response body. OpenAI finish reasons are
/// already in the normalized vocabulary.
pub(crate) fn parse_chat_completion(provider: Provider, body: &Value) -> Result<CallResponse> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .map(String::from);
    let finish_reason = body
        .pointer("/choices/0/finish_reason")
        .and_then(|v| v.as_str())
        .map(|r| r.to_lowercase());
    let usage = body.get("usage").map(|u| Usage {
        input_tokens: u["prompt_tokens"].as_u64().unwrap_or(0),
        output_tokens: u["completion_tokens"].as_u64().unwrap_or(0),
    });

    let tool_calls = body
        .pointer("/choices/0/message/tool_calls")
        .and_then(|v| v.as_array())
        .map(|calls| calls.iter().filter_map(parse_tool_call).collect())
        .unwrap_or_default();

    Ok(CallResponse {
        provider,
        content,
        finish_reason,
        usage,
        tool_calls,
        raw: body.clone(),
        json_mode: false,
    })
}

fn parse_tool_call(call: &Value) -> Option<ToolCallRequest> {
    let name = call.pointer("/function/name")?.as_str()?;
    let raw_arguments = match call.pointer("/function/arguments") {
        Some(Value::String(s)) => s.clone(),
        // Tolerate vendors that inline the object instead of encoding it.
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let mut request = ToolCallRequest::new(name, raw_arguments);
    if let Some(id) = call.get("id").and_then(|v| v.as_str()) {
        request = request.with_id(id);
    }
    Some(request)
}
