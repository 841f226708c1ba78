use super::{DocumentStore, KeyValueStore, DOCUMENTS};
use crate::error::StoreResult;
use crate::ids::{generate_id, DOCUMENT_PREFIX};
use crate::model::{DebateDocument, DocumentSummary, SyncAction, DEFAULT_TITLE};
use crate::richtext::AnnotatedDocument;
use tracing::debug;

/// Partial document update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub content: Option<AnnotatedDocument>,
}

impl<S: KeyValueStore> DocumentStore<S> {
    /// Create and store a new document. Defaults to "Untitled Debate" with empty content.
    pub fn create_document(
        &mut self,
        title: Option<&str>,
        content: Option<AnnotatedDocument>,
    ) -> StoreResult<DebateDocument> {
        let now = self.now();
        let document = DebateDocument {
            id: generate_id(DOCUMENT_PREFIX, now),
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            content: content.unwrap_or_default(),
            annotations: Default::default(),
            created_at: now,
            updated_at: now,
            tags: None,
        };

        self.put_record(DOCUMENTS, &document.id, &document)?;
        self.enqueue_sync(&document.id, SyncAction::Create)?;
        debug!(id = %document.id, "created document");
        Ok(document)
    }

    pub fn get_document(&self, id: &str) -> StoreResult<Option<DebateDocument>> {
        self.get_record(DOCUMENTS, id)
    }

    /// Apply a partial update. Returns `None` when the document does not exist.
    pub fn update_document(
        &mut self,
        id: &str,
        update: DocumentUpdate,
    ) -> StoreResult<Option<DebateDocument>> {
        let Some(mut document) = self.get_document(id)? else {
            return Ok(None);
        };
        if let Some(title) = update.title {
            document.title = title;
        }
        if let Some(content) = update.content {
            document.content = content;
        }
        document.updated_at = self.now();

        self.put_record(DOCUMENTS, id, &document)?;
        self.enqueue_sync(id, SyncAction::Update)?;
        Ok(Some(document))
    }

    /// Returns whether the document existed. Its versions are kept.
    pub fn delete_document(&mut self, id: &str) -> StoreResult<bool> {
        if !self.store.delete(DOCUMENTS, id)? {
            return Ok(false);
        }
        self.enqueue_sync(id, SyncAction::Delete)?;
        debug!(id, "deleted document");
        Ok(true)
    }

    /// Store `document` whole, creating or replacing it.
    ///
    /// With `snapshot_existing`, the previously stored revision is snapshotted first.
    pub fn save_document(
        &mut self,
        document: &DebateDocument,
        snapshot_existing: bool,
    ) -> StoreResult<DebateDocument> {
        let existing = self.get_document(&document.id)?;
        let mut saved = document.clone();
        saved.updated_at = self.now();

        if snapshot_existing && let Some(previous) = &existing {
            self.create_snapshot(previous, None)?;
        }

        self.put_record(DOCUMENTS, &saved.id, &saved)?;
        let action = if existing.is_some() {
            SyncAction::Update
        } else {
            SyncAction::Create
        };
        self.enqueue_sync(&saved.id, action)?;
        Ok(saved)
    }

    /// Summaries, most recently updated first
    pub fn list_summaries(&self) -> StoreResult<Vec<DocumentSummary>> {
        let documents: Vec<DebateDocument> = self.list_records(DOCUMENTS, "updatedAt", None)?;
        Ok(documents.iter().rev().map(DebateDocument::summary).collect())
    }

    /// Case-insensitive match on title or preview
    pub fn search(&self, query: &str) -> StoreResult<Vec<DocumentSummary>> {
        let query = query.to_lowercase();
        Ok(self
            .list_summaries()?
            .into_iter()
            .filter(|s| {
                s.title.to_lowercase().contains(&query) || s.preview.to_lowercase().contains(&query)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::model::SyncAction;
    use crate::richtext::{AnnotatedDocument, AnnotationMark, Block, FallacyMark, TextRun};
    use crate::store::{DocumentStore, DocumentUpdate, MemoryStore};
    use std::rc::Rc;

    fn store() -> (DocumentStore<MemoryStore>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(1_000));
        (DocumentStore::with_clock(MemoryStore::new(), clock.clone()), clock)
    }

    #[test]
    fn test_create_defaults() {
        let (mut store, _) = store();
        let doc = store.create_document(None, None).unwrap();
        assert_eq!(doc.title, "Untitled Debate");
        assert!(doc.content.is_blank());
        assert!(doc.id.starts_with("doc_1000_"));
        assert_eq!(doc.created_at, doc.updated_at);

        let loaded = store.get_document(&doc.id).unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_update_missing_document() {
        let (mut store, _) = store();
        let result = store
            .update_document("doc_missing", DocumentUpdate::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_update_bumps_timestamp() {
        let (mut store, clock) = store();
        let doc = store.create_document(Some("First"), None).unwrap();
        clock.advance(500);
        let updated = store
            .update_document(
                &doc.id,
                DocumentUpdate {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.updated_at, 1_500);
        assert_eq!(updated.created_at, 1_000);
    }

    #[test]
    fn test_list_orders_by_recent_update() {
        let (mut store, clock) = store();
        let a = store.create_document(Some("A"), None).unwrap();
        clock.advance(10);
        let b = store.create_document(Some("B"), None).unwrap();
        clock.advance(10);
        store
            .update_document(&a.id, DocumentUpdate::default())
            .unwrap();

        let titles: Vec<String> = store
            .list_summaries()
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert!(store.delete_document(&b.id).unwrap());
        assert!(!store.delete_document(&b.id).unwrap());
        assert_eq!(store.list_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_summary_counts_embedded_marks() {
        let (mut store, _) = store();
        let mark = FallacyMark::create("m1".into(), "straw-man".into(), "#FF6B6B".into(), 1);
        let content = AnnotatedDocument::from_blocks(vec![
            Block::paragraph().with_run(TextRun::plain("one").with_fallacy_mark(mark.clone())),
            Block::paragraph().with_run(TextRun::plain("two").with_fallacy_mark(mark)),
        ]);
        store.create_document(Some("Marked"), Some(content)).unwrap();

        let summary = &store.list_summaries().unwrap()[0];
        assert_eq!(summary.annotation_count, 1);
        assert_eq!(summary.preview, "onetwo");
    }

    #[test]
    fn test_search_title_and_preview() {
        let (mut store, _) = store();
        store
            .create_document(Some("Climate Debate"), None)
            .unwrap();
        store
            .create_document(Some("Other"), Some(AnnotatedDocument::with_paragraph("Mentions CLIMATE too")))
            .unwrap();
        store.create_document(Some("Unrelated"), None).unwrap();

        assert_eq!(store.search("climate").unwrap().len(), 2);
        assert!(store.search("nothing").unwrap().is_empty());
    }

    #[test]
    fn test_mutations_enqueue_sync_records() {
        let (mut store, clock) = store();
        let doc = store.create_document(None, None).unwrap();
        clock.advance(1);
        store.update_document(&doc.id, DocumentUpdate::default()).unwrap();
        clock.advance(1);
        store.delete_document(&doc.id).unwrap();

        let actions: Vec<SyncAction> = store.pending_sync().unwrap().into_iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![SyncAction::Create, SyncAction::Update, SyncAction::Delete]);
    }

    #[test]
    fn test_save_snapshots_previous_revision() {
        let (mut store, clock) = store();
        let mut doc = store.create_document(Some("v1"), None).unwrap();
        clock.advance(1);
        doc.title = "v2".into();
        store.save_document(&doc, true).unwrap();

        let versions = store.list_versions(&doc.id).unwrap();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].title, "v1");

        clock.advance(1);
        doc.title = "v3".into();
        store.save_document(&doc, false).unwrap();
        assert_eq!(store.list_versions(&doc.id).unwrap().len(), 1);
        assert_eq!(store.get_document(&doc.id).unwrap().unwrap().title, "v3");
    }
}
