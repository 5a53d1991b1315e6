//! Assembling streamed tool-call fragments.
//!
//! Streaming vendors split one tool call across many deltas: the first
//! fragment for an index names the tool and may carry a call id, every later
//! fragment appends a slice of the argument text. The accumulator folds those
//! fragments back into complete [`ToolCallRequest`]s, keeping the argument
//! text raw so the usual instantiation path does the parsing and validation.

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::tool::ToolCallRequest;

/// One streamed fragment of a tool call.
///
/// `index` identifies the call within the response; vendors interleave
/// fragments for different indexes freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A slice of the JSON argument text, appended in arrival order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    /// An opening fragment carrying the tool name.
    pub fn start(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            name: Some(name.into()),
            arguments: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// An argument-text fragment.
    pub fn fragment(index: usize, arguments: impl Into<String>) -> Self {
        Self {
            index,
            id: None,
            name: None,
            arguments: Some(arguments.into()),
        }
    }
}

#[derive(Debug, Default)]
struct PartialCall {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

/// Folds stream deltas into complete tool call requests.
///
/// Tolerant by construction: fragments for an index never seen before open a
/// new entry, repeated names for one index keep the first, and entries that
/// never received a name are dropped at [`finish`](Self::finish) rather than
/// producing an unusable request.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    // Sparse by index; vendors may skip indexes.
    calls: Vec<(usize, PartialCall)>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one delta in.
    pub fn push(&mut self, delta: &ToolCallDelta) {
        let position = match self.calls.iter().position(|(idx, _)| *idx == delta.index) {
            Some(position) => position,
            None => {
                self.calls.push((delta.index, PartialCall::default()));
                self.calls.len() - 1
            }
        };
        let (_, entry) = &mut self.calls[position];
        if entry.id.is_none() {
            entry.id = delta.id.clone();
        }
        if entry.name.is_none() {
            entry.name = delta.name.clone();
        }
        if let Some(ref fragment) = delta.arguments {
            entry.arguments.push_str(fragment);
        }
    }

    /// Close the stream and return the completed requests in index order.
    pub fn finish(mut self) -> Vec<ToolCallRequest> {
        self.calls.sort_by_key(|(index, _)| *index);
        self.calls
            .into_iter()
            .filter_map(|(index, partial)| {
                let name = match partial.name {
                    Some(name) => name,
                    None => {
                        tracing::debug!(index, "dropping nameless streamed tool call");
                        return None;
                    }
                };
                let mut request = ToolCallRequest::new(name, partial.arguments);
                if let Some(id) = partial.id {
                    request = request.with_id(id);
                }
                Some(request)
            })
            .collect()
    }
}

/// Drain a delta stream into completed requests.
pub async fn collect_deltas<S>(stream: S) -> Vec<ToolCallRequest>
where
    S: Stream<Item = ToolCallDelta>,
{
    futures::pin_mut!(stream);
    let mut accumulator = ToolCallAccumulator::new();
    while let Some(delta) = stream.next().await {
        accumulator.push(&delta);
    }
    accumulator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_call_assembly() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&ToolCallDelta::start(0, "lookup").with_id("call_001"));
        acc.push(&ToolCallDelta::fragment(0, r#"{"ci"#));
        acc.push(&ToolCallDelta::fragment(0, r#"ty": "Tokyo"}"#));

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "lookup");
        assert_eq!(calls[0].id.as_deref(), Some("call_001"));
        assert_eq!(calls[0].raw_arguments, r#"{"city": "Tokyo"}"#);
    }

    #[test]
    fn test_interleaved_indexes() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&ToolCallDelta::start(1, "second"));
        acc.push(&ToolCallDelta::start(0, "first"));
        acc.push(&ToolCallDelta::fragment(1, "{}"));
        acc.push(&ToolCallDelta::fragment(0, "{}"));

        let calls = acc.finish();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tool_name, "first");
        assert_eq!(calls[1].tool_name, "second");
    }

    #[test]
    fn test_fragment_before_start_opens_entry() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&ToolCallDelta::fragment(0, r#"{"city": "#));
        acc.push(&ToolCallDelta::start(0, "lookup"));
        acc.push(&ToolCallDelta::fragment(0, r#""Oslo"}"#));

        let calls = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#"{"city": "Oslo"}"#);
    }

    #[test]
    fn test_nameless_entries_are_dropped() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&ToolCallDelta::fragment(3, "{}"));
        assert!(acc.finish().is_empty());
    }

    #[test]
    fn test_repeated_name_keeps_first() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(&ToolCallDelta::start(0, "lookup"));
        acc.push(&ToolCallDelta::start(0, "other"));
        let calls = acc.finish();
        assert_eq!(calls[0].tool_name, "lookup");
    }

    #[tokio::test]
    async fn test_collect_deltas_from_stream() {
        let deltas = vec![
            ToolCallDelta::start(0, "lookup").with_id("call_001"),
            ToolCallDelta::fragment(0, r#"{"city""#),
            ToolCallDelta::fragment(0, r#": "Reykjavik"}"#),
        ];
        let calls = collect_deltas(futures::stream::iter(deltas)).await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].raw_arguments, r#"{"city": "Reykjavik"}"#);
    }
}
