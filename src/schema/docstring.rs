//! Best-effort documentation parsing.
//!
//! Documentation is advisory: the summary becomes the tool description and
//! Google-style `Args:` entries become parameter descriptions. Nothing here
//! ever fails; text that does not look like a docstring simply contributes
//! nothing. That asymmetry is deliberate, tool arguments are load bearing
//! while descriptions are not.

use once_cell::sync::Lazy;
use regex::Regex;

static ARGS_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(Args|Arguments|Parameters)\s*:\s*$").expect("args header regex"));

static OTHER_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(Returns|Raises|Yields|Examples?|Notes?|Attributes)\s*:\s*$")
        .expect("section header regex")
});

static ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\([^)]*\))?\s*:\s*(.*)$").expect("entry regex")
});

/// Parsed documentation: a summary and per-parameter descriptions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Docstring {
    pub summary: String,
    params: Vec<(String, String)>,
}

impl Docstring {
    /// Parse documentation text. Never fails; unrecognized text yields an
    /// empty docstring.
    pub fn parse(text: &str) -> Self {
        enum Section {
            Summary,
            Args,
            Other,
        }

        let mut summary_lines: Vec<&str> = Vec::new();
        let mut params: Vec<(String, String)> = Vec::new();
        let mut section = Section::Summary;

        for line in text.lines() {
            if ARGS_HEADER_RE.is_match(line) {
                section = Section::Args;
                continue;
            }
            if OTHER_HEADER_RE.is_match(line) {
                section = Section::Other;
                continue;
            }

            match section {
                Section::Summary => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        if !summary_lines.is_empty() {
                            section = Section::Other;
                        }
                    } else {
                        summary_lines.push(trimmed);
                    }
                }
                Section::Args => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Some(captures) = ENTRY_RE.captures(line) {
                        params.push((captures[1].to_string(), captures[2].trim().to_string()));
                    } else if let Some(last) = params.last_mut() {
                        // Continuation line for the previous entry.
                        if !last.1.is_empty() {
                            last.1.push(' ');
                        }
                        last.1.push_str(line.trim());
                    }
                }
                Section::Other => {}
            }
        }

        Self {
            summary: summary_lines.join(" "),
            params,
        }
    }

    /// Description for a parameter, if the docs mention it.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d.as_str())
            .filter(|d| !d.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOKUP_DOC: &str = "\
Lookup current weather for a city.

Longer prose the schema does not need.

Args:
    city (str): The city to look up,
        by display name.
    units: Unit system, \"metric\" or \"imperial\".

Returns:
    A human readable weather summary.
";

    #[test]
    fn test_parse_full_docstring() {
        let doc = Docstring::parse(LOOKUP_DOC);
        assert_eq!(doc.summary, "Lookup current weather for a city.");
        assert_eq!(
            doc.param("city"),
            Some("The city to look up, by display name.")
        );
        assert_eq!(doc.param("units"), Some("Unit system, \"metric\" or \"imperial\"."));
        assert_eq!(doc.param("missing"), None);
    }

    #[test]
    fn test_multiline_summary() {
        let doc = Docstring::parse("First line\nsecond line.\n\nDetail paragraph.");
        assert_eq!(doc.summary, "First line second line.");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(Docstring::parse("").is_empty());

        let doc = Docstring::parse(")(*&^%$\n\x00??");
        assert!(doc.summary.contains(")("));
        assert_eq!(doc.param("anything"), None);
    }

    #[test]
    fn test_args_without_descriptions_ignored() {
        let doc = Docstring::parse("Summary.\n\nArgs:\n    city:\n");
        assert_eq!(doc.param("city"), None);
    }

    #[test]
    fn test_alternate_header_spelling() {
        let doc = Docstring::parse("Sum.\n\nParameters:\n    x: The value.\n");
        assert_eq!(doc.param("x"), Some("The value."));
    }
}
