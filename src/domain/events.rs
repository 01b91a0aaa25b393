//! Lifecycle hook events fired by the CMS after a document changes.
//!
//! A host can hand these over one at a time as JSON, or as a stream of
//! newline-delimited JSON (JSONL) for batch replay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::document::PublishableDocument;

/// Per-request options the host threads through a single hook invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Skip every invalidation for this invocation
    #[serde(default)]
    pub disable_revalidate: bool,
}

impl RequestContext {
    /// Context that suppresses invalidation
    pub fn suppressed() -> Self {
        Self {
            disable_revalidate: true,
        }
    }
}

/// One hook invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Fired after a create (no previous state) or update
    AfterChange {
        #[serde(default)]
        previous: Option<PublishableDocument>,
        doc: PublishableDocument,
        #[serde(default)]
        context: RequestContext,
    },

    /// Fired after a delete
    AfterDelete {
        #[serde(default)]
        doc: Option<PublishableDocument>,
        #[serde(default)]
        context: RequestContext,
    },
}

impl LifecycleEvent {
    pub fn context(&self) -> RequestContext {
        match self {
            LifecycleEvent::AfterChange { context, .. } => *context,
            LifecycleEvent::AfterDelete { context, .. } => *context,
        }
    }

    /// Hook name as it appears on the wire
    pub fn hook_name(&self) -> &'static str {
        match self {
            LifecycleEvent::AfterChange { .. } => "after_change",
            LifecycleEvent::AfterDelete { .. } => "after_delete",
        }
    }
}

/// A line in an event stream that could not be decoded
#[derive(Debug, Error)]
#[error("invalid lifecycle event on line {line}: {source}")]
pub struct EventParseError {
    /// 1-based line number
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse a JSONL stream of lifecycle events, skipping blank lines.
pub fn parse_jsonl(input: &str) -> Result<Vec<LifecycleEvent>, EventParseError> {
    let mut events = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let event = serde_json::from_str(line).map_err(|source| EventParseError {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }

    Ok(events)
}
