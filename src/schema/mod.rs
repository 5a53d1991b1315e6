//! Vendor-neutral schema construction and validation.
//!
//! Every tool source reduces to the same neutral object schema before any
//! vendor dialect exists:
//! - `FunctionDecl`: parsed function signatures plus optional docs
//! - `StructSpec` / `FieldSpec` / `TypeSpec`: explicit structured types
//! - `derived_schema`: Rust types deriving `schemars::JsonSchema`
//! - `validate_arguments`: checks parsed call arguments against a schema
//!
//! # Examples
//!
//! ```
//! use mirascope::schema::FunctionDecl;
//!
//! let decl = FunctionDecl::parse(
//!     r#"lookup(city: str, units: str = "metric") -> str"#,
//! ).unwrap();
//! let schema = decl.to_struct_spec().render().unwrap();
//!
//! assert_eq!(schema["required"], serde_json::json!(["city"]));
//! assert_eq!(schema["properties"]["units"]["default"], "metric");
//! ```

pub mod docstring;
pub mod function;
pub mod infer;
pub mod spec;
pub mod validate;

// Re-export commonly used types
pub use docstring::Docstring;
pub use function::{FunctionDecl, ParamDecl};
pub use infer::{derived_schema, DerivedSchema};
pub use spec::{FieldSpec, StructSpec, TypeSpec, TOOL_CALL_KEY, VALUE_FIELD};
pub use validate::{validate_arguments, ValidationIssue};
