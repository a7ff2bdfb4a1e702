//! Library-level tests for the store-backed workflows.
//!
//! A host keeps content in its own store; these tests stand one up in
//! memory and walk the analyze → suggest → apply → re-analyze loop.

use async_trait::async_trait;
use onpage::resolve::{resolve_snapshot, ContentDraft};
use onpage::workflow::{
    analyze_and_persist, apply_suggestions, keywords_for, rewrite_for, Selection,
};
use onpage_core::state::{RewritePhase, SuggestionState};
use onpage_core::store::memory::InMemoryStore;
use onpage_core::store::{AppliedField, ContentStore};
use onpage_core::{
    ContentSnapshot, FocusKeyword, KeywordCandidate, KeywordTemplates, RewriteSuggestions,
    SeoError, Signal, Status, TemplateGenerator, TextGenerator,
};

// ─── Test Generator ─────────────────────────────────────────────────

/// Generator that writes a keyword-targeted rewrite without a network.
struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    fn name(&self) -> &str {
        "echo"
    }

    async fn keyword_candidates(
        &self,
        _snapshot: &ContentSnapshot,
    ) -> Result<Vec<KeywordCandidate>, SeoError> {
        Err(SeoError::unavailable("echo has no keyword model"))
    }

    async fn rewrite(
        &self,
        _snapshot: &ContentSnapshot,
        keyword: &FocusKeyword,
    ) -> Result<RewriteSuggestions, SeoError> {
        Ok(RewriteSuggestions {
            title: Some(format!("The {} Guide", keyword)),
            meta_description: Some(format!("Everything about {}.", keyword)),
            content_notes: vec![format!("Mention {} in the first paragraph", keyword)],
        })
    }
}

fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    let draft = ContentDraft {
        id: "post-7".into(),
        title: Some("Weekend Hiking".into()),
        body_markup: Some("<p>We walked up the hill and back down again.</p>".into()),
        url: "https://blog.test/weekend".into(),
        meta_description_sources: vec!["".into(), "A short trip report.".into()],
        ..ContentDraft::default()
    };
    store
        .insert(resolve_snapshot(draft, Some("https://blog.test")))
        .unwrap();
    store
}

#[tokio::test]
async fn test_analyze_persists_latest_result() {
    let store = seeded_store();

    let first = analyze_and_persist(&store, "post-7", "trail boots").await.unwrap();
    assert_eq!(first.score, 0);
    assert_eq!(first.status, Status::NeedsOptimization);

    let second = analyze_and_persist(&store, "post-7", "hill").await.unwrap();
    assert!(second.score > 0);

    let latest = store.latest_result("post-7").await.unwrap().unwrap();
    assert_eq!(latest, second);
}

#[tokio::test]
async fn test_analyze_unknown_id() {
    let store = seeded_store();
    let err = analyze_and_persist(&store, "missing", "hill").await.unwrap_err();
    assert!(err.to_string().contains("content not found"));
}

#[tokio::test]
async fn test_analyze_invalid_keyword_is_typed() {
    let store = seeded_store();
    let err = analyze_and_persist(&store, "post-7", "").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SeoError>(),
        Some(SeoError::InvalidInput(_))
    ));
    assert!(store.latest_result("post-7").await.unwrap().is_none());
}

#[tokio::test]
async fn test_keywords_fall_back_to_templates() {
    let store = seeded_store();
    let candidates = keywords_for(&store, &EchoGenerator, &KeywordTemplates::default(), "post-7")
        .await
        .unwrap();
    let phrases: Vec<&str> = candidates.iter().map(|c| c.phrase.as_str()).collect();
    assert_eq!(
        phrases,
        vec![
            "Weekend Hiking",
            "Weekend Hiking",
            "Weekend Hiking examples",
            "how does it work Weekend Hiking"
        ]
    );
}

#[tokio::test]
async fn test_rewrite_apply_and_rescore() {
    let store = seeded_store();
    let before = analyze_and_persist(&store, "post-7", "hiking boots").await.unwrap();

    let bundle = rewrite_for(&store, &EchoGenerator, "post-7", "hiking boots")
        .await
        .unwrap();
    assert_eq!(bundle.content_notes.len(), 1);

    let applied = apply_suggestions(&store, "post-7", &bundle, Selection::all())
        .await
        .unwrap();
    assert_eq!(
        applied,
        vec![
            AppliedField::Title,
            AppliedField::MetaTitle,
            AppliedField::MetaDescription
        ]
    );

    let snapshot = store.get_snapshot("post-7").await.unwrap().unwrap();
    assert_eq!(snapshot.title.as_deref(), Some("The hiking boots Guide"));

    let after = analyze_and_persist(&store, "post-7", "hiking boots").await.unwrap();
    assert_eq!(after.points(Signal::KeywordInTitle), 15);
    assert_eq!(after.points(Signal::KeywordInMetaTitle), 10);
    assert_eq!(after.points(Signal::KeywordInMetaDescription), 10);
    assert_eq!(after.score, before.score + 35);
}

#[tokio::test]
async fn test_partial_selection() {
    let store = seeded_store();
    let bundle = RewriteSuggestions {
        title: Some("New title".into()),
        meta_description: None,
        content_notes: vec![],
    };
    let selection = Selection {
        meta_title: true,
        meta_description: true,
        ..Selection::default()
    };
    let applied = apply_suggestions(&store, "post-7", &bundle, selection)
        .await
        .unwrap();
    assert_eq!(applied, vec![AppliedField::MetaTitle]);

    let snapshot = store.get_snapshot("post-7").await.unwrap().unwrap();
    assert_eq!(snapshot.title.as_deref(), Some("Weekend Hiking"));
    assert_eq!(snapshot.existing_meta_title.as_deref(), Some("New title"));
    assert_eq!(
        snapshot.existing_meta_description.as_deref(),
        Some("A short trip report.")
    );
}

#[tokio::test]
async fn test_template_rewrite_fails_and_state_records_it() {
    let store = seeded_store();
    let mut state = SuggestionState::new();
    state.request_rewrite();
    let err = rewrite_for(&store, &TemplateGenerator::default(), "post-7", "hiking")
        .await
        .unwrap_err();
    let seo = err.downcast_ref::<SeoError>().cloned().unwrap();
    assert!(seo.is_retryable());

    assert!(state.rewrite_finished::<RewriteSuggestions>(&Err(seo)));
    assert_eq!(state.rewrite, RewritePhase::Failed);
}
