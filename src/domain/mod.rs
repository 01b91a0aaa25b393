//! Domain types for revalidator.
//!
//! This module contains the core data structures:
//! - Document: Article snapshots handed over by the CMS
//! - Events: Lifecycle hook invocations and their request context
//! - Media: Prop contract of the media component

pub mod document;
pub mod events;
pub mod media;

// Re-export commonly used types
pub use document::{DocumentStatus, PublishableDocument};
pub use events::{parse_jsonl, EventParseError, LifecycleEvent, RequestContext};
pub use media::{Loading, MediaProps, MediaResource, ResponsiveWidth, StaticImage};
