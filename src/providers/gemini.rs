//! Gemini dialect.
//!
//! Tools are grouped under `function_declarations`, and `parameters` must be
//! omitted entirely for no-argument tools (the API rejects empty property
//! maps). Responses nest under `candidates[0].content.parts`, tool calls as
//! `functionCall` parts with object arguments and no call ids. Forced tool
//! choice goes through the function-calling config with mode `ANY`.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::providers::{Provider, ProviderAdapter};
use crate::response::{CallResponse, Usage};
use crate::tool::{ToolCallRequest, ToolDefinition};

pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn tool_schema(&self, tool: &ToolDefinition) -> Value {
        let mut declaration = Map::new();
        declaration.insert("description".into(), json!(tool.description()));
        declaration.insert("name".into(), json!(tool.name()));
        if tool.has_parameters() {
            declaration.insert("parameters".into(), tool.parameters().clone());
        }
        json!({ "function_declarations": [Value::from(declaration)] })
    }

    fn tool_choice(&self, tool_name: &str) -> Option<Value> {
        Some(json!({
            "function_calling_config": {
                "allowed_function_names": [tool_name],
                "mode": "ANY",
            }
        }))
    }

    fn parse_response(&self, body: &Value) -> Result<CallResponse> {
        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(|p| p.as_array())
            .cloned()
            .unwrap_or_default();

        let content = parts
            .iter()
            .find_map(|p| p.get("text").and_then(|t| t.as_str()))
            .map(String::from);

        let finish_reason = body
            .pointer("/candidates/0/finishReason")
            .and_then(|v| v.as_str())
            .map(|r| match r {
                "STOP" => "stop".to_string(),
                "MAX_TOKENS" => "length".to_string(),
                "SAFETY" | "RECITATION" => "content_filter".to_string(),
                other => other.to_lowercase(),
            });

        let usage = body.get("usageMetadata").map(|u| Usage {
            input_tokens: u["promptTokenCount"].as_u64().unwrap_or(0),
            output_tokens: u["candidatesTokenCount"].as_u64().unwrap_or(0),
        });

        // Gemini assigns no call ids; requests carry name and args only.
        let tool_calls = parts
            .iter()
            .filter_map(|p| p.get("functionCall"))
            .filter_map(|call| {
                let name = call.get("name")?.as_str()?;
                let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
                Some(ToolCallRequest::new(name, args.to_string()))
            })
            .collect();

        Ok(CallResponse {
            provider: Provider::Gemini,
            content,
            finish_reason,
            usage,
            tool_calls,
            raw: body.clone(),
            json_mode: false,
        })
    }
}
