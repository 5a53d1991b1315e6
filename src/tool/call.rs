//! The return trip: vendor tool calls back into validated instances.
//!
//! Vendors hand back a tool name and a string of JSON they promise matches
//! the schema they were shown. Neither promise is trusted: the string is
//! parsed (malformed JSON is an `ArgumentParse` error) and the parsed value
//! is validated against the parameter schema (`ArgumentValidation` on any
//! violation) before an instance exists at all.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::schema::{validate_arguments, ValidationIssue, TOOL_CALL_KEY};
use crate::tool::definition::{ToolDefinition, ToolHandler};

/// A tool call exactly as a vendor reported it.
///
/// `raw_arguments` is untrusted text; nothing is parsed until a definition
/// instantiates the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Vendor call id. Absent for vendors that do not assign ids and for
    /// calls reconstructed from content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tool_name: String,
    pub raw_arguments: String,
}

impl ToolCallRequest {
    pub fn new(tool_name: impl Into<String>, raw_arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            tool_name: tool_name.into(),
            raw_arguments: raw_arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A validated tool call bound to its definition's handler.
///
/// Explicit arguments stay exactly as the vendor sent them; schema defaults
/// are merged only when resolving, so an omitted optional parameter remains
/// observable as omitted.
#[derive(Clone)]
pub struct ToolInstance {
    tool_name: String,
    arguments: Map<String, Value>,
    defaults: Map<String, Value>,
    tool_call: ToolCallRequest,
    handler: Option<ToolHandler>,
}

impl ToolDefinition {
    /// Parse and validate a vendor call against this definition.
    pub fn instantiate(&self, request: &ToolCallRequest) -> Result<ToolInstance> {
        let parsed: Value = serde_json::from_str(&request.raw_arguments)
            .map_err(|source| Error::argument_parse(self.name(), source))?;

        let issues = validate_arguments(&parsed, self.parameters());
        if !issues.is_empty() {
            return Err(Error::argument_validation(self.name(), issues));
        }

        let Value::Object(arguments) = parsed else {
            // validate_arguments rejects non-object tops, so this only
            // guards against a schema with no issues for a scalar.
            return Err(Error::argument_validation(
                self.name(),
                vec![ValidationIssue::new("Expected type 'object' at the top level")],
            ));
        };

        Ok(ToolInstance {
            tool_name: self.name().to_string(),
            arguments,
            defaults: self.defaults(),
            tool_call: request.clone(),
            handler: self.handler().cloned(),
        })
    }
}

impl ToolInstance {
    pub fn name(&self) -> &str {
        &self.tool_name
    }

    /// The arguments the vendor explicitly sent.
    pub fn arguments(&self) -> &Map<String, Value> {
        &self.arguments
    }

    /// An explicitly sent argument.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// An argument, falling back to its schema default when omitted.
    pub fn resolved(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name).or_else(|| self.defaults.get(name))
    }

    /// Explicit arguments with schema defaults filled in for absent
    /// optionals. This is what handlers receive.
    pub fn resolved_arguments(&self) -> Map<String, Value> {
        let mut resolved = self.defaults.clone();
        for (name, value) in &self.arguments {
            resolved.insert(name.clone(), value.clone());
        }
        resolved
    }

    /// The originating vendor call.
    pub fn tool_call(&self) -> &ToolCallRequest {
        &self.tool_call
    }

    /// Vendor call id, when the vendor assigned one.
    pub fn call_id(&self) -> Option<&str> {
        self.tool_call.id.as_deref()
    }

    /// Run the definition's handler with the resolved arguments.
    pub fn invoke(&self) -> Result<Value> {
        match &self.handler {
            Some(handler) => handler(&self.resolved_arguments()),
            None => Err(Error::execution(format!(
                "tool '{}' has no handler attached",
                self.tool_name
            ))),
        }
    }

    /// Dump the instance: explicit arguments plus the call back-reference
    /// under the reserved key. The back-reference wins over any argument a
    /// vendor padded in under that name.
    pub fn to_value(&self) -> Value {
        let mut map = self.arguments.clone();
        map.insert(TOOL_CALL_KEY.into(), json!(self.tool_call));
        map.into()
    }
}

impl fmt::Debug for ToolInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolInstance")
            .field("tool_name", &self.tool_name)
            .field("arguments", &self.arguments)
            .field("tool_call", &self.tool_call)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_DOC: &str = "\
Lookup current weather for a city.

Args:
    city: The city to look up.
    units: Unit system, \"metric\" or \"imperial\".
";

    fn lookup_tool() -> ToolDefinition {
        ToolDefinition::from_signature(
            r#"lookup(city: str, units: str = "metric") -> str"#,
            Some(LOOKUP_DOC),
        )
        .unwrap()
    }

    fn reykjavik_request() -> ToolCallRequest {
        ToolCallRequest::new("lookup", r#"{"city": "Reykjavik"}"#).with_id("call_001")
    }

    #[test]
    fn test_instantiate_happy_path() {
        let instance = lookup_tool().instantiate(&reykjavik_request()).unwrap();
        assert_eq!(instance.name(), "lookup");
        assert_eq!(instance.get("city"), Some(&json!("Reykjavik")));
        assert_eq!(instance.call_id(), Some("call_001"));
    }

    #[test]
    fn test_omitted_optional_stays_observable() {
        let instance = lookup_tool().instantiate(&reykjavik_request()).unwrap();

        // Not explicitly sent...
        assert_eq!(instance.get("units"), None);
        assert!(!instance.arguments().contains_key("units"));

        // ...but resolvable to its default.
        assert_eq!(instance.resolved("units"), Some(&json!("metric")));
        assert_eq!(
            instance.resolved_arguments().get("units"),
            Some(&json!("metric"))
        );
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let request = ToolCallRequest::new("lookup", r#"{"city": "#);
        let err = lookup_tool().instantiate(&request).unwrap_err();
        assert!(matches!(err, Error::ArgumentParse { .. }));
    }

    #[test]
    fn test_missing_required_is_validation_error() {
        let request = ToolCallRequest::new("lookup", r#"{"units": "imperial"}"#);
        let err = lookup_tool().instantiate(&request).unwrap_err();
        match &err {
            Error::ArgumentValidation { tool, issues } => {
                assert_eq!(tool, "lookup");
                assert!(issues[0].message.contains("Missing required property: city"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_validation_error() {
        let request = ToolCallRequest::new("lookup", r#"{"city": 17}"#);
        let err = lookup_tool().instantiate(&request).unwrap_err();
        assert!(matches!(err, Error::ArgumentValidation { .. }));
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let request = ToolCallRequest::new("lookup", "[1, 2, 3]");
        let err = lookup_tool().instantiate(&request).unwrap_err();
        assert!(err.to_string().contains("Expected type 'object'"));
    }

    #[test]
    fn test_invoke_resolves_defaults() {
        let tool = lookup_tool().with_handler(|args| {
            let city = args.get("city").and_then(|v| v.as_str()).unwrap_or("?");
            let units = args.get("units").and_then(|v| v.as_str()).unwrap_or("?");
            Ok(json!(format!("{} in {}", city, units)))
        });

        let result = tool.instantiate(&reykjavik_request()).unwrap().invoke().unwrap();
        assert_eq!(result, json!("Reykjavik in metric"));
    }

    #[test]
    fn test_invoke_without_handler_fails() {
        let instance = lookup_tool().instantiate(&reykjavik_request()).unwrap();
        let err = instance.invoke().unwrap_err();
        assert!(matches!(err, Error::Execution(_)));
    }

    #[test]
    fn test_back_reference_round_trip() {
        let request = reykjavik_request();
        let instance = lookup_tool().instantiate(&request).unwrap();
        assert_eq!(instance.tool_call(), &request);

        let dumped = instance.to_value();
        assert_eq!(dumped["city"], "Reykjavik");
        assert_eq!(dumped["tool_call"]["tool_name"], "lookup");
        assert_eq!(dumped["tool_call"]["id"], "call_001");
    }

    #[test]
    fn test_vendor_padding_is_ignored() {
        let request = ToolCallRequest::new(
            "lookup",
            r#"{"city": "Oslo", "vendor_extra": {"nested": true}}"#,
        );
        let instance = lookup_tool().instantiate(&request).unwrap();
        assert_eq!(instance.get("vendor_extra"), Some(&json!({"nested": true})));
    }
}
