//! Invalidator Integration Tests
//!
//! Tests for which paths and tags each document transition invalidates.

use revalidator::{
    resolve_path, DocumentStatus, InvalidationCall, PublishStateInvalidator, PublishableDocument,
    RecordingInvalidator, RequestContext,
};

const LISTING_TAG: &str = "articles-sitemap";
const DELETE_TAG: &str = "pages-sitemap";

fn doc(slug: &str, status: DocumentStatus) -> PublishableDocument {
    PublishableDocument::new(slug, status)
}

fn enabled() -> RequestContext {
    RequestContext::default()
}

#[test]
fn test_publish_invalidates_page_and_listing() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    let previous = doc("about", DocumentStatus::Draft);
    let updated = doc("about", DocumentStatus::Published);
    invalidator.after_change(Some(&previous), updated, &enabled(), &recorder);

    assert_eq!(
        recorder.calls(),
        vec![
            InvalidationCall::path("/about"),
            InvalidationCall::tag(LISTING_TAG),
        ]
    );
}

#[test]
fn test_published_doc_invalidates_for_any_previous_state() {
    let invalidator = PublishStateInvalidator::default();
    let previous_states = [
        None,
        Some(doc("about", DocumentStatus::Draft)),
        Some(doc("about", DocumentStatus::Published)),
        Some(doc("old-about", DocumentStatus::Other("scheduled".to_string()))),
    ];

    for previous in previous_states {
        let recorder = RecordingInvalidator::new();
        invalidator.after_change(
            previous.as_ref(),
            doc("about", DocumentStatus::Published),
            &enabled(),
            &recorder,
        );

        assert_eq!(
            recorder.calls(),
            vec![
                InvalidationCall::path("/about"),
                InvalidationCall::tag(LISTING_TAG),
            ],
            "previous state: {:?}",
            previous
        );
    }
}

#[test]
fn test_unpublish_home_invalidates_root() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    let previous = doc("home", DocumentStatus::Published);
    invalidator.after_change(
        Some(&previous),
        doc("home", DocumentStatus::Draft),
        &enabled(),
        &recorder,
    );

    assert_eq!(
        recorder.calls(),
        vec![InvalidationCall::path("/"), InvalidationCall::tag(LISTING_TAG)]
    );
}

#[test]
fn test_unpublish_with_slug_change_uses_old_path() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    let previous = doc("launch", DocumentStatus::Published);
    invalidator.after_change(
        Some(&previous),
        doc("launch-draft", DocumentStatus::Other("archived".to_string())),
        &enabled(),
        &recorder,
    );

    assert_eq!(
        recorder.calls(),
        vec![
            InvalidationCall::path("/launch"),
            InvalidationCall::tag(LISTING_TAG),
        ]
    );
}

#[test]
fn test_never_published_invalidates_nothing() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    invalidator.after_change(None, doc("a", DocumentStatus::Draft), &enabled(), &recorder);
    invalidator.after_change(
        Some(&doc("a", DocumentStatus::Draft)),
        doc("a", DocumentStatus::Other("pending".to_string())),
        &enabled(),
        &recorder,
    );

    assert!(recorder.is_empty());
}

#[test]
fn test_disable_revalidate_suppresses_everything() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();
    let ctx = RequestContext::suppressed();

    invalidator.after_change(None, doc("a", DocumentStatus::Published), &ctx, &recorder);
    invalidator.after_change(
        Some(&doc("a", DocumentStatus::Published)),
        doc("a", DocumentStatus::Draft),
        &ctx,
        &recorder,
    );
    invalidator.after_delete(Some(doc("a", DocumentStatus::Published)), &ctx, &recorder);
    invalidator.after_delete(None, &ctx, &recorder);

    assert!(recorder.is_empty());
}

#[test]
fn test_delete_invalidates_even_if_never_published() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    invalidator.after_delete(Some(doc("x", DocumentStatus::Draft)), &enabled(), &recorder);

    assert_eq!(
        recorder.calls(),
        vec![InvalidationCall::path("/x"), InvalidationCall::tag(DELETE_TAG)]
    );
}

#[test]
fn test_delete_without_document_only_invalidates_tag() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    let returned = invalidator.after_delete(None, &enabled(), &recorder);

    assert!(returned.is_none());
    assert_eq!(recorder.calls(), vec![InvalidationCall::tag(DELETE_TAG)]);
    assert!(!recorder
        .calls()
        .iter()
        .any(|c| matches!(c, InvalidationCall::Path(p) if p.contains("undefined"))));
}

#[test]
fn test_documents_pass_through_unchanged() {
    let invalidator = PublishStateInvalidator::default();
    let recorder = RecordingInvalidator::new();

    let updated = doc("about", DocumentStatus::Published)
        .with_field("id", 7)
        .with_field("title", "About");
    let returned = invalidator.after_change(None, updated.clone(), &enabled(), &recorder);
    assert_eq!(returned, updated);

    let suppressed = invalidator.after_change(
        None,
        updated.clone(),
        &RequestContext::suppressed(),
        &recorder,
    );
    assert_eq!(suppressed, updated);

    let deleted = doc("gone", DocumentStatus::Draft).with_field("id", 8);
    let returned = invalidator.after_delete(Some(deleted.clone()), &enabled(), &recorder);
    assert_eq!(returned, Some(deleted));
}

#[test]
fn test_resolve_path_examples() {
    assert_eq!(resolve_path("home"), "/");
    assert_eq!(resolve_path("about"), "/about");
}

#[test]
fn test_shared_invalidator_across_threads() {
    use std::sync::Arc;

    let invalidator = Arc::new(PublishStateInvalidator::default());
    let recorder = Arc::new(RecordingInvalidator::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let invalidator = Arc::clone(&invalidator);
            let recorder = Arc::clone(&recorder);
            std::thread::spawn(move || {
                let slug = format!("post-{}", i);
                invalidator.after_change(
                    None,
                    PublishableDocument::new(slug, DocumentStatus::Published),
                    &RequestContext::default(),
                    &recorder,
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let calls = recorder.calls();
    assert_eq!(calls.len(), 8);
    for i in 0..4 {
        assert!(calls.contains(&InvalidationCall::path(format!("/post-{}", i))));
    }
}
