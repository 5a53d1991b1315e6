//! Argument validation against parameter schemas.
//!
//! Runs on the parsed JSON a vendor sent back, after parsing succeeded and
//! before a tool instance is built. Supports:
//! - Type checks (string, integer, number, boolean, array, object, null)
//! - Required properties, recursive object and array validation
//! - Enum membership
//! - String constraints (minLength, maxLength, pattern)
//! - Numeric constraints (minimum, maximum) and array bounds (minItems, maxItems)
//!
//! Properties the schema does not declare are ignored; vendors are allowed
//! to pad tool calls and that must never fail an otherwise valid call.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One schema violation, located by a dotted path from the argument root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    /// Dotted location such as `author.name` or `tags[1]`; `None` at the root.
    pub path: Option<String>,
}

impl ValidationIssue {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    pub fn at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Validate parsed arguments against a parameter schema.
///
/// Returns every violation found; an empty list means the arguments conform.
pub fn validate_arguments(arguments: &Value, schema: &Value) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !arguments.is_object() {
        issues.push(ValidationIssue::new(format!(
            "Expected type 'object', got '{}'",
            type_name(arguments)
        )));
        return issues;
    }
    check(arguments, schema, "", &mut issues);
    issues
}

fn check(data: &Value, schema: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    if let Some(expected) = schema.get("type").and_then(|t| t.as_str()) {
        if !type_matches(data, expected) {
            issues.push(located(
                format!("Expected type '{}', got '{}'", expected, type_name(data)),
                path,
            ));
            // Deeper checks are meaningless on the wrong type.
            return;
        }
    }

    if let Some(enum_values) = schema.get("enum").and_then(|e| e.as_array()) {
        check_enum(data, enum_values, path, issues);
    }

    match data {
        Value::String(s) => check_string(s, schema, path, issues),
        Value::Number(_) => {
            if let Some(num) = data.as_f64() {
                check_number(num, schema, path, issues);
            }
        }
        Value::Array(items) => check_array(items, schema, path, issues),
        Value::Object(map) => check_object(map, schema, path, issues),
        _ => {}
    }
}

fn check_string(s: &str, schema: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    if let Some(min) = schema.get("minLength").and_then(|m| m.as_u64()) {
        if s.chars().count() < min as usize {
            issues.push(located(
                format!("String too short (minimum {} characters)", min),
                path,
            ));
        }
    }
    if let Some(max) = schema.get("maxLength").and_then(|m| m.as_u64()) {
        if s.chars().count() > max as usize {
            issues.push(located(
                format!("String too long (maximum {} characters)", max),
                path,
            ));
        }
    }
    if let Some(pattern) = schema.get("pattern").and_then(|p| p.as_str()) {
        // An uncompilable pattern skips the check rather than failing the call.
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(s) {
                issues.push(located(
                    "String does not match required pattern".to_string(),
                    path,
                ));
            }
        }
    }
}

fn check_number(value: f64, schema: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    if let Some(minimum) = schema.get("minimum").and_then(|m| m.as_f64()) {
        if value < minimum {
            issues.push(located(format!("Value below minimum ({})", minimum), path));
        }
    }
    if let Some(maximum) = schema.get("maximum").and_then(|m| m.as_f64()) {
        if value > maximum {
            issues.push(located(format!("Value above maximum ({})", maximum), path));
        }
    }
}

fn check_array(items: &[Value], schema: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    if let Some(min) = schema.get("minItems").and_then(|m| m.as_u64()) {
        if items.len() < min as usize {
            issues.push(located(
                format!("Array too short (minimum {} items)", min),
                path,
            ));
        }
    }
    if let Some(max) = schema.get("maxItems").and_then(|m| m.as_u64()) {
        if items.len() > max as usize {
            issues.push(located(
                format!("Array too long (maximum {} items)", max),
                path,
            ));
        }
    }
    if let Some(item_schema) = schema.get("items") {
        for (index, item) in items.iter().enumerate() {
            check(item, item_schema, &format!("{}[{}]", path, index), issues);
        }
    }
}

fn check_object(
    map: &serde_json::Map<String, Value>,
    schema: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
        for name in required.iter().filter_map(|v| v.as_str()) {
            if !map.contains_key(name) {
                issues.push(ValidationIssue::at(
                    format!("Missing required property: {}", name),
                    join_path(path, name),
                ));
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (name, property_schema) in properties {
            if let Some(value) = map.get(name) {
                check(value, property_schema, &join_path(path, name), issues);
            }
        }
    }
}

fn check_enum(data: &Value, allowed: &[Value], path: &str, issues: &mut Vec<ValidationIssue>) {
    if !allowed.contains(data) {
        let rendered: Vec<String> = allowed
            .iter()
            .map(|v| match v {
                Value::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            })
            .collect();
        issues.push(located(
            format!("Value not in allowed enum values: {}", rendered.join(", ")),
            path,
        ));
    }
}

fn type_matches(data: &Value, expected: &str) -> bool {
    match expected {
        "string" => data.is_string(),
        "integer" => data.is_i64() || data.is_u64(),
        "number" => data.is_number(),
        "boolean" => data.is_boolean(),
        "array" => data.is_array(),
        "object" => data.is_object(),
        "null" => data.is_null(),
        // Unknown type keyword, accept anything.
        _ => true,
    }
}

fn type_name(data: &Value) -> &'static str {
    match data {
        Value::String(_) => "string",
        Value::Number(_) => {
            if data.as_i64().is_some() || data.as_u64().is_some() {
                "integer"
            } else {
                "number"
            }
        }
        Value::Bool(_) => "boolean",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

fn located(message: String, path: &str) -> ValidationIssue {
    if path.is_empty() {
        ValidationIssue::new(message)
    } else {
        ValidationIssue::at(message, path)
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
