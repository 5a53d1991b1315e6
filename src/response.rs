//! Unified call responses across vendors.
//!
//! Provider parsers reduce every response body to this one shape: text
//! content, a normalized finish reason, token usage, and the tool calls the
//! vendor reported. `tools` then runs the return trip against a set of
//! definitions, including the JSON-mode path where the model answered with a
//! bare JSON object instead of a structured tool call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::providers::Provider;
use crate::tool::{ToolCallRequest, ToolDefinition, ToolInstance};

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fence regex"));

/// Token usage reported by a vendor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// A vendor response in unified shape.
#[derive(Debug, Clone, Serialize)]
pub struct CallResponse {
    pub provider: Provider,
    /// First text content in the response, when present.
    pub content: Option<String>,
    /// Finish reason normalized across vendors: `stop`, `length`,
    /// `tool_calls`, `content_filter`, or a lowercased vendor value.
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
    /// Tool calls exactly as the vendor reported them, arguments unparsed.
    pub tool_calls: Vec<ToolCallRequest>,
    /// Raw body, for everything the unified shape drops.
    pub raw: Value,
    /// Set when the request ran in JSON mode; `tools` then reconstructs the
    /// call from content instead of reading `tool_calls`.
    #[serde(skip)]
    pub json_mode: bool,
}

impl CallResponse {
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    /// Instantiate the tool calls in this response against definitions.
    ///
    /// Fails fast when the model ran out of tokens (`finish_reason ==
    /// "length"`), since a truncated call would parse as malformed JSON and
    /// mislead the caller. In JSON mode, or when there are no structured
    /// calls but the content is a bare JSON object (code fences tolerated),
    /// a single call is reconstructed from content targeting the first
    /// definition. Calls naming a tool with no matching definition are
    /// skipped.
    pub fn tools(&self, definitions: &[ToolDefinition]) -> Result<Vec<ToolInstance>> {
        if self.finish_reason.as_deref() == Some("length") {
            return Err(Error::ResponseTruncated {
                finish_reason: "length".into(),
            });
        }

        let reconstructed: Vec<ToolCallRequest>;
        let calls: &[ToolCallRequest] = if self.json_mode
            || (self.tool_calls.is_empty() && self.content_looks_like_json())
        {
            reconstructed = self.reconstruct_call(definitions).into_iter().collect();
            &reconstructed
        } else {
            &self.tool_calls
        };

        let mut instances = Vec::new();
        for call in calls {
            match definitions.iter().find(|d| d.name() == call.tool_name) {
                Some(definition) => instances.push(definition.instantiate(call)?),
                None => {
                    tracing::debug!(
                        tool = %call.tool_name,
                        "no definition matches tool call; skipping"
                    );
                }
            }
        }
        Ok(instances)
    }

    /// First tool instance in the response, if any.
    pub fn tool(&self, definitions: &[ToolDefinition]) -> Result<Option<ToolInstance>> {
        Ok(self.tools(definitions)?.into_iter().next())
    }

    /// Serialize the unified view, raw body included.
    pub fn dump(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn content_looks_like_json(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| extract_json_text(c).starts_with('{'))
            .unwrap_or(false)
    }

    fn reconstruct_call(&self, definitions: &[ToolDefinition]) -> Option<ToolCallRequest> {
        let definition = definitions.first()?;
        let content = self.content.as_deref()?;
        let arguments = extract_json_text(content);
        if arguments.is_empty() {
            return None;
        }
        tracing::debug!(
            tool = %definition.name(),
            "reconstructing tool call from response content"
        );
        Some(ToolCallRequest::new(definition.name(), arguments))
    }
}

/// Strip a markdown code fence when the content arrives wrapped in one.
fn extract_json_text(content: &str) -> &str {
    if let Some(captures) = JSON_FENCE_RE.captures(content) {
        if let Some(inner) = captures.get(1) {
            return inner.as_str();
        }
    }
    content.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lookup_tool() -> ToolDefinition {
        ToolDefinition::from_signature(
            r#"lookup(city: str, units: str = "metric") -> str"#,
            Some("Lookup current weather for a city."),
        )
        .unwrap()
    }

    fn response(tool_calls: Vec<ToolCallRequest>) -> CallResponse {
        CallResponse {
            provider: Provider::OpenAI,
            content: None,
            finish_reason: Some("tool_calls".into()),
            usage: Some(Usage::new(10, 5)),
            tool_calls,
            raw: json!({}),
            json_mode: false,
        }
    }

    #[test]
    fn test_tools_instantiates_matching_calls() {
        let resp = response(vec![
            ToolCallRequest::new("lookup", r#"{"city": "Oslo"}"#).with_id("call_1")
        ]);
        let instances = resp.tools(&[lookup_tool()]).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].get("city"), Some(&json!("Oslo")));
        assert_eq!(instances[0].call_id(), Some("call_1"));
    }

    #[test]
    fn test_unmatched_calls_are_skipped() {
        let resp = response(vec![
            ToolCallRequest::new("other_tool", r#"{"x": 1}"#),
            ToolCallRequest::new("lookup", r#"{"city": "Oslo"}"#),
        ]);
        let instances = resp.tools(&[lookup_tool()]).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].name(), "lookup");
    }

    #[test]
    fn test_length_finish_reason_is_an_error() {
        let mut resp = response(vec![ToolCallRequest::new("lookup", r#"{"city": "O"#)]);
        resp.finish_reason = Some("length".into());
        let err = resp.tools(&[lookup_tool()]).unwrap_err();
        assert!(matches!(err, Error::ResponseTruncated { .. }));
    }

    #[test]
    fn test_json_mode_reconstructs_from_content() {
        let mut resp = response(Vec::new()).with_json_mode(true);
        resp.content = Some(r#"{"city": "Reykjavik"}"#.into());

        let instances = resp.tools(&[lookup_tool()]).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].get("city"), Some(&json!("Reykjavik")));
        // Reconstructed calls carry no vendor id.
        assert_eq!(instances[0].call_id(), None);
    }

    #[test]
    fn test_bare_json_content_reconstructs_without_json_mode() {
        let mut resp = response(Vec::new());
        resp.content = Some("```json\n{\"city\": \"Reykjavik\"}\n```".into());

        let instances = resp.tools(&[lookup_tool()]).unwrap();
        assert_eq!(instances.len(), 1);
    }

    #[test]
    fn test_prose_content_reconstructs_nothing() {
        let mut resp = response(Vec::new());
        resp.content = Some("The weather is fine.".into());
        assert!(resp.tools(&[lookup_tool()]).unwrap().is_empty());
    }

    #[test]
    fn test_reconstructed_arguments_still_validate() {
        let mut resp = response(Vec::new()).with_json_mode(true);
        resp.content = Some(r#"{"units": "metric"}"#.into());

        let err = resp.tools(&[lookup_tool()]).unwrap_err();
        assert!(matches!(err, Error::ArgumentValidation { .. }));
    }

    #[test]
    fn test_tool_returns_first() {
        let resp = response(vec![
            ToolCallRequest::new("lookup", r#"{"city": "Oslo"}"#),
            ToolCallRequest::new("lookup", r#"{"city": "Bergen"}"#),
        ]);
        let first = resp.tool(&[lookup_tool()]).unwrap().unwrap();
        assert_eq!(first.get("city"), Some(&json!("Oslo")));
    }

    #[test]
    fn test_usage_total() {
        assert_eq!(Usage::new(10, 5).total(), 15);
    }

    #[test]
    fn test_dump_serializes_unified_view() {
        let resp = response(vec![ToolCallRequest::new("lookup", "{}")]);
        let dump = resp.dump();
        assert_eq!(dump["provider"], "openai");
        assert_eq!(dump["usage"]["input_tokens"], 10);
        assert_eq!(dump["tool_calls"][0]["tool_name"], "lookup");
    }
}
