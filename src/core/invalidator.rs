//! Publish-state driven cache invalidation.
//!
//! Turns a document lifecycle transition into invalidation requests:
//!
//! | Hook | Condition | Path | Tag |
//! |------|-----------|------|-----|
//! | after change | new state published | new slug | `published` |
//! | after change | published → not published | previous slug | `unpublished` |
//! | after delete | always | deleted slug | `deleted` |
//!
//! The two change rows are evaluated independently. Nothing happens when
//! the request context disables revalidation.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapters::CacheInvalidator;
use crate::domain::{LifecycleEvent, PublishableDocument, RequestContext};

/// Slug rendered at the site root
pub const HOME_SLUG: &str = "home";

/// Tag groups invalidated alongside a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapTags {
    /// Tag for a document that is (still) published
    #[serde(default = "default_articles_tag")]
    pub published: String,

    /// Tag for a document leaving the published state
    #[serde(default = "default_articles_tag")]
    pub unpublished: String,

    /// Tag for a deleted document
    #[serde(default = "default_deleted_tag")]
    pub deleted: String,
}

fn default_articles_tag() -> String {
    "articles-sitemap".to_string()
}
fn default_deleted_tag() -> String {
    "pages-sitemap".to_string()
}

impl Default for SitemapTags {
    fn default() -> Self {
        Self {
            published: default_articles_tag(),
            unpublished: default_articles_tag(),
            deleted: default_deleted_tag(),
        }
    }
}

/// What one transition requires to be invalidated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvalidationRequest {
    pub path: Option<String>,
    pub tag: Option<String>,
}

impl InvalidationRequest {
    /// Issue the request on a backend, path first
    pub fn issue(&self, sink: &impl CacheInvalidator) {
        if let Some(ref path) = self.path {
            sink.invalidate_path(path);
        }
        if let Some(ref tag) = self.tag {
            sink.invalidate_tag(tag);
        }
    }
}

/// Public path of a slug: `home` is `/`, anything else `/<slug>`
pub fn resolve_path(slug: &str) -> String {
    if slug == HOME_SLUG {
        "/".to_string()
    } else {
        format!("/{}", slug)
    }
}

/// Decides and issues invalidations for document lifecycle hooks
#[derive(Debug, Clone, Default)]
pub struct PublishStateInvalidator {
    tags: SitemapTags,
}

impl PublishStateInvalidator {
    pub fn new(tags: SitemapTags) -> Self {
        Self { tags }
    }

    /// Requests for a create (`previous == None`) or update
    pub fn plan_change(
        &self,
        previous: Option<&PublishableDocument>,
        doc: &PublishableDocument,
        ctx: &RequestContext,
    ) -> Vec<InvalidationRequest> {
        let mut requests = Vec::new();

        if ctx.disable_revalidate {
            return requests;
        }

        if doc.is_published() {
            requests.push(self.request_for(doc, &self.tags.published));
        }

        if let Some(prev) = previous {
            if prev.is_published() && !doc.is_published() {
                requests.push(self.request_for(prev, &self.tags.unpublished));
            }
        }

        requests
    }

    /// Requests for a delete, independent of the deleted document's status
    pub fn plan_delete(
        &self,
        doc: Option<&PublishableDocument>,
        ctx: &RequestContext,
    ) -> Option<InvalidationRequest> {
        if ctx.disable_revalidate {
            return None;
        }

        Some(InvalidationRequest {
            path: doc.and_then(|d| d.slug()).map(resolve_path),
            tag: Some(self.tags.deleted.clone()),
        })
    }

    /// Invalidate after a create or update. Returns `doc` unchanged.
    pub fn after_change(
        &self,
        previous: Option<&PublishableDocument>,
        doc: PublishableDocument,
        ctx: &RequestContext,
        sink: &impl CacheInvalidator,
    ) -> PublishableDocument {
        for request in self.plan_change(previous, &doc, ctx) {
            if let Some(ref path) = request.path {
                if doc.is_published() {
                    info!("Revalidating article at path: {}", path);
                } else {
                    info!("Revalidating old article at path: {}", path);
                }
            }
            request.issue(sink);
        }

        doc
    }

    /// Invalidate after a delete. Returns `doc` unchanged.
    pub fn after_delete(
        &self,
        doc: Option<PublishableDocument>,
        ctx: &RequestContext,
        sink: &impl CacheInvalidator,
    ) -> Option<PublishableDocument> {
        if let Some(request) = self.plan_delete(doc.as_ref(), ctx) {
            match request.path {
                Some(ref path) => info!("Revalidating deleted article at path: {}", path),
                None => warn!("Deleted article has no slug, only invalidating tag"),
            }
            request.issue(sink);
        }

        doc
    }

    /// Dispatch a lifecycle event to the matching hook
    pub fn handle(
        &self,
        event: LifecycleEvent,
        sink: &impl CacheInvalidator,
    ) -> Option<PublishableDocument> {
        match event {
            LifecycleEvent::AfterChange {
                previous,
                doc,
                context,
            } => Some(self.after_change(previous.as_ref(), doc, &context, sink)),
            LifecycleEvent::AfterDelete { doc, context } => {
                self.after_delete(doc, &context, sink)
            }
        }
    }

    fn request_for(&self, doc: &PublishableDocument, tag: &str) -> InvalidationRequest {
        let path = doc.slug().map(resolve_path);
        if path.is_none() {
            warn!(status = ?doc.status(), "Article has no slug, only invalidating tag");
        }

        InvalidationRequest {
            path,
            tag: Some(tag.to_string()),
        }
    }
}
