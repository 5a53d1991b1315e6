//! Derived tool schemas from Rust types.
//!
//! `schemars` turns a deriving type into a JSON schema; this module reduces
//! that output to the same neutral object schema the other sources produce:
//! subschemas inlined, `title` keywords stripped at every level, the root
//! description popped so the envelope can carry it.

use schemars::gen::SchemaSettings;
use serde_json::Value;

use crate::error::{Error, Result};

/// A schema derived from a Rust type, split the way envelopes consume it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSchema {
    /// The schemars schema name, normally the type name.
    pub name: String,
    /// Doc comment on the type, empty when absent.
    pub description: String,
    /// Neutral object schema for the type's fields.
    pub parameters: Value,
}

/// Derive the neutral schema for `T`.
///
/// Fails when `T` does not describe an object (wrap primitives with
/// `ToolDefinition::from_primitive` instead).
pub fn derived_schema<T: schemars::JsonSchema>() -> Result<DerivedSchema> {
    let settings = SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let root = settings.into_generator().into_root_schema_for::<T>();
    let name = T::schema_name();

    let mut parameters = serde_json::to_value(&root)?;
    let map = match parameters.as_object_mut() {
        Some(map) => map,
        None => {
            return Err(Error::schema_build(
                &name,
                "derived schema is not a JSON object",
            ))
        }
    };
    map.remove("$schema");
    map.remove("definitions");

    let description = map
        .remove("description")
        .and_then(|d| d.as_str().map(|s| s.to_string()))
        .unwrap_or_default();

    if map.get("type").and_then(|t| t.as_str()) != Some("object") {
        return Err(Error::schema_build(
            &name,
            "derived schema must describe an object; wrap primitives with from_primitive",
        ));
    }

    strip_titles(&mut parameters);

    Ok(DerivedSchema {
        name,
        description,
        parameters,
    })
}

/// Remove `title` keywords at every schema level without touching
/// properties that happen to be named `title`.
fn strip_titles(schema: &mut Value) {
    let map = match schema.as_object_mut() {
        Some(map) => map,
        None => return,
    };
    map.remove("title");

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for prop in props.values_mut() {
            strip_titles(prop);
        }
    }
    if let Some(items) = map.get_mut("items") {
        match items {
            Value::Array(entries) => {
                for entry in entries {
                    strip_titles(entry);
                }
            }
            other => strip_titles(other),
        }
    }
    if let Some(additional) = map.get_mut("additionalProperties") {
        if additional.is_object() {
            strip_titles(additional);
        }
    }
    for combinator in ["anyOf", "allOf", "oneOf"] {
        if let Some(Value::Array(entries)) = map.get_mut(combinator) {
            for entry in entries {
                strip_titles(entry);
            }
        }
    }
}
