//! Cohere dialect.
//!
//! The flattest envelope of the five: `{name, description, parameters}` with
//! no wrapper and no forced-choice knob. Responses report tool calls at the
//! top level with object parameters and no call ids; billing lives under
//! `meta.billed_units`.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::providers::{Provider, ProviderAdapter};
use crate::response::{CallResponse, Usage};
use crate::tool::{ToolCallRequest, ToolDefinition};

pub struct CohereAdapter;

impl ProviderAdapter for CohereAdapter {
    fn provider(&self) -> Provider {
        Provider::Cohere
    }

    fn tool_schema(&self, tool: &ToolDefinition) -> Value {
        let mut envelope = Map::new();
        envelope.insert("description".into(), json!(tool.description()));
        envelope.insert("name".into(), json!(tool.name()));
        envelope.insert("parameters".into(), tool.parameters().clone());
        envelope.into()
    }

    fn tool_choice(&self, _tool_name: &str) -> Option<Value> {
        // The chat API has no forced-tool parameter.
        None
    }

    fn parse_response(&self, body: &Value) -> Result<CallResponse> {
        let content = body
            .get("text")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(String::from);

        let finish_reason = body
            .get("finish_reason")
            .and_then(|v| v.as_str())
            .map(|r| match r {
                "COMPLETE" => "stop".to_string(),
                "MAX_TOKENS" => "length".to_string(),
                "ERROR_TOXIC" => "content_filter".to_string(),
                other => other.to_lowercase(),
            });

        let usage = body.pointer("/meta/billed_units").map(|u| Usage {
            input_tokens: u["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: u["output_tokens"].as_u64().unwrap_or(0),
        });

        let tool_calls = body
            .get("tool_calls")
            .and_then(|c| c.as_array())
            .map(|calls| {
                calls
                    .iter()
                    .filter_map(|call| {
                        let name = call.get("name")?.as_str()?;
                        let parameters =
                            call.get("parameters").cloned().unwrap_or_else(|| json!({}));
                        Some(ToolCallRequest::new(name, parameters.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(CallResponse {
            provider: Provider::Cohere,
            content,
            finish_reason,
            usage,
            tool_calls,
            raw: body.clone(),
            json_mode: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_tool() -> ToolDefinition {
        ToolDefinition::from_signature(
            r#"lookup(city: str, units: str = "metric") -> str"#,
            Some("Lookup current weather for a city."),
        )
        .unwrap()
    }

    #[test]
    fn test_tool_schema_is_flat() {
        let envelope = CohereAdapter.tool_schema(&lookup_tool());
        assert_eq!(envelope["name"], "lookup");
        assert_eq!(envelope["parameters"]["type"], "object");
        assert!(envelope.get("function").is_none());
        assert!(envelope.get("input_schema").is_none());
    }

    #[test]
    fn test_no_forced_choice() {
        assert_eq!(CohereAdapter.tool_choice("lookup"), None);
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let body = json!({
            "text": "",
            "finish_reason": "COMPLETE",
            "tool_calls": [
                {"name": "lookup", "parameters": {"city": "Reykjavik"}}
            ],
            "meta": {"billed_units": {"input_tokens": 40, "output_tokens": 11}}
        });

        let resp = CohereAdapter.parse_response(&body).unwrap();
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage, Some(Usage::new(40, 11)));
        assert_eq!(resp.content, None);
        assert_eq!(resp.tool_calls[0].id, None);

        let instance = lookup_tool().instantiate(&resp.tool_calls[0]).unwrap();
        assert_eq!(instance.get("city"), Some(&json!("Reykjavik")));
    }

    #[test]
    fn test_finish_reason_normalization() {
        let body = json!({"text": "done", "finish_reason": "MAX_TOKENS"});
        let resp = CohereAdapter.parse_response(&body).unwrap();
        assert_eq!(resp.finish_reason.as_deref(), Some("length"));
    }
}
