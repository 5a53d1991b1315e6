//! Vendor-neutral parameter schemas.
//!
//! Every tool source (parsed signature, explicit struct spec, derived Rust
//! type) reduces to this small type model before any vendor dialect is
//! rendered. Rendering goes through `serde_json::Map`, which is ordered by
//! key, so the same spec always serializes to byte-identical JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};

/// Key reserved for the call back-reference attached to tool instances.
/// User fields may not use it.
pub const TOOL_CALL_KEY: &str = "tool_call";

/// Field name a bare primitive is wrapped under when it becomes a
/// one-field object schema.
pub const VALUE_FIELD: &str = "value";

/// The type model tool parameters reduce to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpec {
    String,
    Integer,
    Number,
    Boolean,
    /// A closed set of allowed string values.
    Enum(Vec<String>),
    Array(Box<TypeSpec>),
    Object(StructSpec),
}

impl TypeSpec {
    /// The JSON schema `type` keyword this spec renders to.
    pub fn json_type(&self) -> &'static str {
        match self {
            TypeSpec::String | TypeSpec::Enum(_) => "string",
            TypeSpec::Integer => "integer",
            TypeSpec::Number => "number",
            TypeSpec::Boolean => "boolean",
            TypeSpec::Array(_) => "array",
            TypeSpec::Object(_) => "object",
        }
    }

    /// True for types `from_primitive` accepts as wrappable.
    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeSpec::Object(_))
    }

    fn render(&self) -> Result<Value> {
        let schema = match self {
            TypeSpec::String => json!({"type": "string"}),
            TypeSpec::Integer => json!({"type": "integer"}),
            TypeSpec::Number => json!({"type": "number"}),
            TypeSpec::Boolean => json!({"type": "boolean"}),
            TypeSpec::Enum(values) => json!({"enum": values, "type": "string"}),
            TypeSpec::Array(items) => {
                let mut map = Map::new();
                map.insert("items".into(), items.render()?);
                map.insert("type".into(), json!("array"));
                map.into()
            }
            TypeSpec::Object(spec) => spec.render_fields()?,
        };
        Ok(schema)
    }
}

/// A single named parameter or struct field.
///
/// A field without a default is required; a field with one is optional.
/// There is no third state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeSpec,
    pub description: Option<String>,
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A required field of the given type.
    pub fn required(name: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default: None,
        }
    }

    /// An optional field carrying its default value.
    pub fn optional(name: impl Into<String>, ty: TypeSpec, default: Value) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
            default: Some(default),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    fn render(&self) -> Result<Value> {
        let mut map = match self.ty.render()? {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("type".into(), other);
                map
            }
        };
        if let Some(ref default) = self.default {
            map.insert("default".into(), default.clone());
        }
        if let Some(ref description) = self.description {
            if !description.is_empty() {
                map.insert("description".into(), json!(description));
            }
        }
        Ok(map.into())
    }
}

/// An explicit object schema: the structured-type source.
///
/// Built in place, in the same spirit as a derive would produce, then
/// rendered once into the neutral object schema:
///
/// ```
/// use mirascope::schema::{FieldSpec, StructSpec, TypeSpec};
///
/// let book = StructSpec::new("Book")
///     .description("A book recommendation")
///     .field(FieldSpec::required("title", TypeSpec::String))
///     .field(FieldSpec::optional("year", TypeSpec::Integer, 2024.into()));
/// assert_eq!(book.required_fields(), vec!["title"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructSpec {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl StructSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Names of all fields without defaults, in declaration order.
    pub fn required_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_required())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Render the neutral object schema.
    ///
    /// Fails when a top-level field collides with the reserved
    /// back-reference key. Nested objects are exempt; the back-reference
    /// only ever attaches at the instance root. Later fields overwrite
    /// earlier ones with the same name.
    pub fn render(&self) -> Result<Value> {
        if let Some(field) = self.fields.iter().find(|f| f.name == TOOL_CALL_KEY) {
            return Err(Error::schema_build(
                &self.name,
                format!("field name '{}' is reserved for the call back-reference", field.name),
            ));
        }
        self.render_fields()
    }

    fn render_fields(&self) -> Result<Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.clone(), field.render()?);
            if field.is_required() && !required.iter().any(|r| r == &field.name) {
                required.push(field.name.clone());
            }
        }
        required.sort();

        let mut map = Map::new();
        map.insert("properties".into(), properties.into());
        if !required.is_empty() {
            map.insert("required".into(), json!(required));
        }
        map.insert("type".into(), json!("object"));
        Ok(map.into())
    }

    /// Wrap a primitive type as a one-field object schema under the
    /// reserved `value` field.
    pub fn wrapping(name: impl Into<String>, ty: TypeSpec) -> Result<Self> {
        let name = name.into();
        if !ty.is_primitive() {
            return Err(Error::schema_build(
                &name,
                "object types cannot be wrapped as primitives; build a StructSpec instead",
            ));
        }
        Ok(Self {
            name,
            description: None,
            fields: vec![FieldSpec::required(VALUE_FIELD, ty)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_object() {
        let spec = StructSpec::new("Book")
            .field(FieldSpec::required("title", TypeSpec::String))
            .field(FieldSpec::required("pages", TypeSpec::Integer));

        let schema = spec.render().unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["title"]["type"], "string");
        assert_eq!(schema["properties"]["pages"]["type"], "integer");
        assert_eq!(schema["required"], json!(["pages", "title"]));
    }

    #[test]
    fn test_required_follows_defaults() {
        let spec = StructSpec::new("Lookup")
            .field(FieldSpec::required("city", TypeSpec::String))
            .field(FieldSpec::optional("units", TypeSpec::String, json!("metric")));

        let schema = spec.render().unwrap();
        assert_eq!(schema["required"], json!(["city"]));
        assert_eq!(schema["properties"]["units"]["default"], "metric");
    }

    #[test]
    fn test_reserved_field_rejected() {
        let spec = StructSpec::new("Bad")
            .field(FieldSpec::required("tool_call", TypeSpec::String));

        let err = spec.render().unwrap_err();
        assert!(matches!(err, Error::SchemaBuild { .. }));
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_primitive_wrapper() {
        let spec = StructSpec::wrapping("Answer", TypeSpec::Integer).unwrap();
        let schema = spec.render().unwrap();
        assert_eq!(schema["properties"]["value"]["type"], "integer");
        assert_eq!(schema["required"], json!(["value"]));

        let nested = StructSpec::new("X");
        assert!(StructSpec::wrapping("Bad", TypeSpec::Object(nested)).is_err());
    }

    #[test]
    fn test_nested_struct_and_array() {
        let author = StructSpec::new("Author")
            .field(FieldSpec::required("name", TypeSpec::String))
            .field(FieldSpec::optional("born", TypeSpec::Integer, Value::Null));
        let spec = StructSpec::new("Book")
            .field(FieldSpec::required("author", TypeSpec::Object(author)))
            .field(FieldSpec::required(
                "tags",
                TypeSpec::Array(Box::new(TypeSpec::String)),
            ));

        let schema = spec.render().unwrap();
        let author_schema = &schema["properties"]["author"];
        assert_eq!(author_schema["type"], "object");
        assert_eq!(author_schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["tags"]["items"]["type"], "string");
    }

    #[test]
    fn test_enum_field() {
        let spec = StructSpec::new("Pick").field(FieldSpec::required(
            "color",
            TypeSpec::Enum(vec!["red".into(), "green".into()]),
        ));

        let schema = spec.render().unwrap();
        assert_eq!(schema["properties"]["color"]["enum"], json!(["red", "green"]));
        assert_eq!(schema["properties"]["color"]["type"], "string");
    }

    #[test]
    fn test_render_is_deterministic() {
        let spec = StructSpec::new("Lookup")
            .field(FieldSpec::required("city", TypeSpec::String).description("City name"))
            .field(FieldSpec::optional("units", TypeSpec::String, json!("metric")));

        let first = serde_json::to_string(&spec.render().unwrap()).unwrap();
        let second = serde_json::to_string(&spec.render().unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
