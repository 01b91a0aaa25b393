//! revalidator - publish-state driven cache revalidation
//!
//! Decides which cached pages of a CMS article collection go stale after
//! a document is created, updated, or deleted, and signals the front-end
//! cache to drop them.
//!
//! # Modules
//!
//! - `adapters`: Invalidation backends (HTTP, log, in-memory recorder)
//! - `core`: Invalidation decisions (PublishStateInvalidator)
//! - `domain`: Data structures (Document, LifecycleEvent, MediaProps)
//! - `config`: Backend and tag configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Show what an update would invalidate
//! revalidator change --previous before.json --doc after.json --dry-run
//!
//! # Replay a batch of hook events against the configured endpoint
//! revalidator replay events.jsonl
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{CacheInvalidator, InvalidationCall, RecordingInvalidator};
pub use crate::core::{resolve_path, InvalidationRequest, PublishStateInvalidator, SitemapTags};
pub use domain::{DocumentStatus, LifecycleEvent, PublishableDocument, RequestContext};
