//! Core revalidation logic.
//!
//! This module contains:
//! - Invalidator: maps document lifecycle transitions to cache invalidations

pub mod invalidator;

// Re-export commonly used types
pub use invalidator::{
    resolve_path, InvalidationRequest, PublishStateInvalidator, SitemapTags, HOME_SLUG,
};
