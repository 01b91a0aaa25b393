//! In-memory backend that records every invalidation call.
//!
//! Used by tests and by `--dry-run` to show what a hook would invalidate.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::CacheInvalidator;

/// A single invalidation primitive call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum InvalidationCall {
    Path(String),
    Tag(String),
}

impl InvalidationCall {
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }
}

impl std::fmt::Display for InvalidationCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidationCall::Path(p) => write!(f, "path {}", p),
            InvalidationCall::Tag(t) => write!(f, "tag  {}", t),
        }
    }
}

/// Call with the time it was received
#[derive(Debug, Clone, Serialize)]
pub struct RecordedCall {
    pub call: InvalidationCall,
    pub at: DateTime<Utc>,
}

/// Backend that keeps every call in order
#[derive(Debug, Default)]
pub struct RecordingInvalidator {
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingInvalidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<InvalidationCall> {
        self.lock().iter().map(|r| r.call.clone()).collect()
    }

    /// Calls with their timestamps
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain all recorded calls
    pub fn take(&self) -> Vec<InvalidationCall> {
        self.lock().drain(..).map(|r| r.call).collect()
    }

    fn record(&self, call: InvalidationCall) {
        self.lock().push(RecordedCall {
            call,
            at: Utc::now(),
        });
    }

    // A poisoned lock still holds valid data, the recorder never panics mid-push
    fn lock(&self) -> MutexGuard<'_, Vec<RecordedCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheInvalidator for RecordingInvalidator {
    fn name(&self) -> &str {
        "recording"
    }

    fn invalidate_path(&self, path: &str) {
        self.record(InvalidationCall::path(path));
    }

    fn invalidate_tag(&self, tag: &str) {
        self.record(InvalidationCall::tag(tag));
    }
}
