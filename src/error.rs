use thiserror::Error;

use crate::schema::ValidationIssue;

/// Result type alias for the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the tool conversion layer.
///
/// The split mirrors how failures reach us: `SchemaBuild` is a programmer
/// error caught while defining a tool, `ArgumentParse` is a vendor anomaly
/// (models do emit broken JSON), and `ArgumentValidation` means the JSON was
/// well formed but violates the declared parameter schema. Documentation
/// problems never surface here at all; doc parsing falls back to empty text.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool definition itself is unbuildable (unknown annotation,
    /// reserved field name, unsupported type shape).
    #[error("Schema build error for tool '{tool}': {reason}")]
    SchemaBuild { tool: String, reason: String },

    /// The vendor returned argument text that is not valid JSON.
    #[error("Tool call '{tool}' carried malformed JSON arguments: {source}")]
    ArgumentParse {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    /// The parsed arguments violate the tool's parameter schema.
    #[error("Tool call '{tool}' failed argument validation{}", format_issues(.issues))]
    ArgumentValidation {
        tool: String,
        issues: Vec<ValidationIssue>,
    },

    /// The model stopped early; any tool call in the response is suspect.
    #[error("Response finished with reason '{finish_reason}'; tool calls are incomplete")]
    ResponseTruncated { finish_reason: String },

    /// A tool handler refused or failed to run.
    #[error("Tool execution error: {0}")]
    Execution(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to render the issue list for display
fn format_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = issues.iter().map(|issue| issue.to_string()).collect();
    format!(": {}", parts.join("; "))
}

impl Error {
    /// Create a schema build error for the named tool.
    pub fn schema_build(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::SchemaBuild {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create an argument parse error wrapping the serde failure.
    pub fn argument_parse(tool: impl Into<String>, source: serde_json::Error) -> Self {
        Error::ArgumentParse {
            tool: tool.into(),
            source,
        }
    }

    /// Create an argument validation error from collected issues.
    pub fn argument_validation(tool: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        Error::ArgumentValidation {
            tool: tool.into(),
            issues,
        }
    }

    /// Create an execution error from a handler failure message.
    pub fn execution(message: impl Into<String>) -> Self {
        Error::Execution(message.into())
    }

    /// Validation issues carried by this error, if any.
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            Error::ArgumentValidation { issues, .. } => Some(issues),
            _ => None,
        }
    }
}
