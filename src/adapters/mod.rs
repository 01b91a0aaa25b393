//! Cache invalidation backends.
//!
//! Backends receive the two invalidation primitives: drop one rendered
//! path, or drop everything tagged with a group name. Calls are
//! fire-and-forget, a backend never reports failure to the caller.

pub mod http;
pub mod recording;

use std::sync::Arc;

use tracing::info;

pub use http::{HttpRevalidator, RevalidateError};
pub use recording::{InvalidationCall, RecordedCall, RecordingInvalidator};

/// Trait for cache invalidation backends
pub trait CacheInvalidator: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Mark the cached rendering of `path` as stale
    fn invalidate_path(&self, path: &str);

    /// Mark every cached entry tagged with `tag` as stale
    fn invalidate_tag(&self, tag: &str);
}

impl<T: CacheInvalidator + ?Sized> CacheInvalidator for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invalidate_path(&self, path: &str) {
        (**self).invalidate_path(path)
    }

    fn invalidate_tag(&self, tag: &str) {
        (**self).invalidate_tag(tag)
    }
}

impl<T: CacheInvalidator + ?Sized> CacheInvalidator for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn invalidate_path(&self, path: &str) {
        (**self).invalidate_path(path)
    }

    fn invalidate_tag(&self, tag: &str) {
        (**self).invalidate_tag(tag)
    }
}

/// Backend that only logs what would be invalidated
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInvalidator;

impl CacheInvalidator for LogInvalidator {
    fn name(&self) -> &str {
        "log"
    }

    fn invalidate_path(&self, path: &str) {
        info!(path, "invalidate path");
    }

    fn invalidate_tag(&self, tag: &str) {
        info!(tag, "invalidate tag");
    }
}
