//! The callable tool source: function signature parsing.
//!
//! A signature string such as `lookup(city: str, units: str = "metric") -> str`
//! carries everything a parameter schema needs: names, annotations, and
//! defaults. Annotations must resolve to a known type; one that does not is a
//! hard build error naming the parameter. Accepted annotations:
//!
//! - `str` / `string`, `int` / `integer`, `float` / `number`, `bool` / `boolean`
//! - `list[T]` / `List[T]` with any accepted `T`
//! - `Literal["a", "b"]` with string literals only
//!
//! A leading `def ` and a trailing `:` are tolerated so signatures can be
//! pasted verbatim from source they originate in. `self` and `cls` receivers
//! are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::schema::docstring::Docstring;
use crate::schema::spec::{FieldSpec, StructSpec, TypeSpec};

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:def\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)\)\s*(?:->\s*([^:]+?))?\s*:?\s*$")
        .expect("signature regex")
});

static PARAM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("param name regex"));

/// One parsed parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeSpec,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl ParamDecl {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A parsed function declaration: the callable source for tool schemas.
///
/// The function name becomes the tool name verbatim; a call request naming
/// `lookup` matches a declaration parsed from `lookup(...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<ParamDecl>,
    /// Raw return annotation, kept for reporting only.
    pub returns: Option<String>,
    pub summary: Option<String>,
}

impl FunctionDecl {
    /// Parse a signature string.
    pub fn parse(signature: &str) -> Result<Self> {
        let captures = SIGNATURE_RE.captures(signature).ok_or_else(|| {
            Error::schema_build(
                guess_name(signature),
                format!("unparseable function signature: '{}'", signature.trim()),
            )
        })?;

        let name = captures[1].to_string();
        let params_src = captures.get(2).map(|m| m.as_str()).unwrap_or("");
        let returns = captures.get(3).map(|m| m.as_str().trim().to_string());

        let mut params = Vec::new();
        for fragment in split_top_level(params_src, ',') {
            let fragment = fragment.trim();
            if fragment.is_empty() || fragment == "self" || fragment == "cls" {
                continue;
            }
            params.push(parse_param(&name, fragment)?);
        }

        Ok(Self {
            name,
            params,
            returns,
            summary: None,
        })
    }

    /// Attach documentation text, best effort.
    ///
    /// The summary becomes the tool description and `Args:` entries become
    /// parameter descriptions. Text that does not parse changes nothing.
    pub fn with_docs(mut self, text: &str) -> Self {
        let doc = Docstring::parse(text);
        if !doc.summary.is_empty() {
            self.summary = Some(doc.summary.clone());
        }
        for param in &mut self.params {
            if let Some(description) = doc.param(&param.name) {
                param.description = Some(description.to_string());
            }
        }
        self
    }

    /// Reduce to the neutral struct spec.
    pub fn to_struct_spec(&self) -> StructSpec {
        let mut spec = StructSpec::new(&self.name);
        if let Some(ref summary) = self.summary {
            spec = spec.description(summary.clone());
        }
        for param in &self.params {
            let mut field = match &param.default {
                Some(default) => {
                    FieldSpec::optional(&param.name, param.ty.clone(), default.clone())
                }
                None => FieldSpec::required(&param.name, param.ty.clone()),
            };
            if let Some(ref description) = param.description {
                field = field.description(description.clone());
            }
            spec = spec.field(field);
        }
        spec
    }
}

fn parse_param(tool: &str, fragment: &str) -> Result<ParamDecl> {
    if fragment.starts_with('*') {
        return Err(Error::schema_build(
            tool,
            format!("variadic parameter '{}' cannot be described by a schema", fragment),
        ));
    }

    let (name_part, rest) = match find_top_level(fragment, ':') {
        Some(idx) => (&fragment[..idx], Some(&fragment[idx + 1..])),
        None => (fragment, None),
    };
    let name = name_part.trim();
    if !PARAM_NAME_RE.is_match(name) {
        return Err(Error::schema_build(
            tool,
            format!("invalid parameter name '{}'", name),
        ));
    }

    let rest = rest.ok_or_else(|| {
        Error::schema_build(tool, format!("parameter '{}' has no type annotation", name))
    })?;

    let (annotation_part, default_part) = match find_top_level(rest, '=') {
        Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
        None => (rest, None),
    };
    let annotation = annotation_part.trim();
    if annotation.is_empty() {
        return Err(Error::schema_build(
            tool,
            format!("parameter '{}' has no type annotation", name),
        ));
    }

    let ty = resolve_annotation(tool, name, annotation)?;
    let default = match default_part {
        Some(text) => Some(parse_default(tool, name, text)?),
        None => None,
    };

    Ok(ParamDecl {
        name: name.to_string(),
        ty,
        default,
        description: None,
    })
}

/// Resolve an annotation to a type spec, recursively for containers.
fn resolve_annotation(tool: &str, param: &str, annotation: &str) -> Result<TypeSpec> {
    let annotation = annotation.trim();
    match annotation {
        "str" | "string" => return Ok(TypeSpec::String),
        "int" | "integer" => return Ok(TypeSpec::Integer),
        "float" | "number" => return Ok(TypeSpec::Number),
        "bool" | "boolean" => return Ok(TypeSpec::Boolean),
        _ => {}
    }

    if let Some(inner) = bracketed(annotation, &["list", "List", "Sequence"]) {
        return Ok(TypeSpec::Array(Box::new(resolve_annotation(
            tool, param, inner,
        )?)));
    }

    if let Some(inner) = bracketed(annotation, &["Literal"]) {
        let mut values = Vec::new();
        for piece in split_top_level(inner, ',') {
            let piece = piece.trim();
            match unquote(piece) {
                Some(value) => values.push(value.to_string()),
                None => {
                    return Err(Error::schema_build(
                        tool,
                        format!(
                            "Literal value {} for parameter '{}' is not a string literal",
                            piece, param
                        ),
                    ))
                }
            }
        }
        if values.is_empty() {
            return Err(Error::schema_build(
                tool,
                format!("Literal annotation for parameter '{}' has no values", param),
            ));
        }
        return Ok(TypeSpec::Enum(values));
    }

    Err(Error::schema_build(
        tool,
        format!(
            "cannot resolve annotation '{}' for parameter '{}'",
            annotation, param
        ),
    ))
}

/// Parse a default into a JSON value. `None`/`True`/`False` and
/// single-quoted strings are normalized first; everything else must already
/// be a JSON literal.
fn parse_default(tool: &str, param: &str, text: &str) -> Result<Value> {
    let text = text.trim();
    match text {
        "None" => return Ok(Value::Null),
        "True" => return Ok(Value::Bool(true)),
        "False" => return Ok(Value::Bool(false)),
        _ => {}
    }

    let candidate = if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        format!("\"{}\"", &text[1..text.len() - 1])
    } else {
        text.to_string()
    };

    serde_json::from_str(&candidate).map_err(|_| {
        Error::schema_build(
            tool,
            format!("default for parameter '{}' is not a literal: {}", param, text),
        )
    })
}

/// Split on `sep` at bracket depth zero, outside string literals.
fn split_top_level(input: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for ch in input.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c == sep && depth == 0 => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        parts.push(current);
    }
    parts
}

/// Byte index of the first `sep` at depth zero, outside string literals.
fn find_top_level(input: &str, sep: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in input.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => return Some(idx),
            _ => {}
        }
    }
    None
}

/// `list[inner]` style unwrapping for any of the given heads.
fn bracketed<'a>(annotation: &'a str, heads: &[&str]) -> Option<&'a str> {
    for head in heads {
        if let Some(rest) = annotation.strip_prefix(head) {
            let rest = rest.trim_start();
            if let Some(inner) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                return Some(inner);
            }
        }
    }
    None
}

fn unquote(text: &str) -> Option<&str> {
    if text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')))
    {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn guess_name(signature: &str) -> String {
    signature
        .trim()
        .trim_start_matches("def ")
        .split(['(', ' ', ':'])
        .find(|s| !s.is_empty())
        .unwrap_or("function")
        .to_string()
}
