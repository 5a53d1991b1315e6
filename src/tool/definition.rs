//! Tool definitions: the hub between local sources and vendor dialects.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::providers::{self, Provider};
use crate::schema::{derived_schema, FunctionDecl, StructSpec, TypeSpec, TOOL_CALL_KEY};

/// Handler a validated instance invokes. Receives the resolved arguments
/// (explicit values plus schema defaults for absent optionals).
pub type ToolHandler = Arc<dyn Fn(&Map<String, Value>) -> Result<Value> + Send + Sync>;

/// A tool the model may call.
///
/// Holds the vendor-neutral parameter schema; vendor dialects are rendered
/// on demand and never stored, so one definition serves every provider.
#[derive(Clone, Serialize)]
pub struct ToolDefinition {
    name: String,
    description: String,
    parameters: Value,
    #[serde(skip)]
    handler: Option<ToolHandler>,
}

impl ToolDefinition {
    /// Build from a prebuilt object schema.
    ///
    /// The schema must be object shaped and may not declare the reserved
    /// back-reference key.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::schema_build(
                "<unnamed>",
                "tool name must not be empty",
            ));
        }
        if !parameters.is_object() {
            return Err(Error::schema_build(
                &name,
                "parameter schema must be a JSON object",
            ));
        }
        if parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .is_some_and(|props| props.contains_key(TOOL_CALL_KEY))
        {
            return Err(Error::schema_build(
                &name,
                format!(
                    "property '{}' is reserved for the call back-reference",
                    TOOL_CALL_KEY
                ),
            ));
        }
        Ok(Self {
            name,
            description: description.into(),
            parameters,
            handler: None,
        })
    }

    /// Build from a parsed function declaration. The function name becomes
    /// the tool name verbatim.
    pub fn from_function(decl: &FunctionDecl) -> Result<Self> {
        let spec = decl.to_struct_spec();
        let parameters = spec.render()?;
        Self::new(spec.name, spec.description.unwrap_or_default(), parameters)
    }

    /// Parse a signature string (and optional documentation) directly.
    pub fn from_signature(signature: &str, docs: Option<&str>) -> Result<Self> {
        let mut decl = FunctionDecl::parse(signature)?;
        if let Some(text) = docs {
            decl = decl.with_docs(text);
        }
        Self::from_function(&decl)
    }

    /// Build from an explicit struct spec.
    pub fn from_struct(spec: &StructSpec) -> Result<Self> {
        let parameters = spec.render()?;
        Self::new(
            spec.name.clone(),
            spec.description.clone().unwrap_or_default(),
            parameters,
        )
    }

    /// Wrap a primitive type as a one-field tool under the reserved
    /// `value` field.
    pub fn from_primitive(name: impl Into<String>, ty: TypeSpec) -> Result<Self> {
        let spec = StructSpec::wrapping(name, ty)?;
        Self::from_struct(&spec)
    }

    /// Build from a Rust type deriving `schemars::JsonSchema`. The schema
    /// name becomes the tool name and the type's doc comment its description.
    pub fn from_type<T: schemars::JsonSchema>() -> Result<Self> {
        let derived = derived_schema::<T>()?;
        Self::new(derived.name, derived.description, derived.parameters)
    }

    /// Attach the handler a validated instance will invoke.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Map<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The vendor-neutral parameter schema.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// True when the schema declares at least one property.
    pub fn has_parameters(&self) -> bool {
        self.parameters
            .get("properties")
            .and_then(|p| p.as_object())
            .is_some_and(|props| !props.is_empty())
    }

    /// Names the schema marks required.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Render this definition in a vendor's dialect.
    pub fn provider_schema(&self, provider: Provider) -> Value {
        providers::adapter(provider).tool_schema(self)
    }

    pub(crate) fn handler(&self) -> Option<&ToolHandler> {
        self.handler.as_ref()
    }

    /// Schema defaults for optional properties, keyed by property name.
    pub(crate) fn defaults(&self) -> Map<String, Value> {
        let mut defaults = Map::new();
        if let Some(props) = self.parameters.get("properties").and_then(|p| p.as_object()) {
            for (name, schema) in props {
                if let Some(default) = schema.get("default") {
                    defaults.insert(name.clone(), default.clone());
                }
            }
        }
        defaults
    }
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}
