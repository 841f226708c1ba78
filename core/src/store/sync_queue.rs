use super::{DocumentStore, KeyValueStore, SYNC_QUEUE};
use crate::error::StoreResult;
use crate::ids::{generate_id, SYNC_PREFIX};
use crate::model::{SyncAction, SyncQueueEntry};
use serde_json::Value;

impl<S: KeyValueStore> DocumentStore<S> {
    /// Record a change for a later remote sync. Nothing consumes the queue yet.
    pub(super) fn enqueue_sync(&mut self, document_id: &str, action: SyncAction) -> StoreResult<()> {
        let timestamp = self.now();
        let entry = SyncQueueEntry {
            id: generate_id(SYNC_PREFIX, timestamp),
            document_id: document_id.to_string(),
            action,
            timestamp,
            synced: false,
        };
        self.put_record(SYNC_QUEUE, &entry.id, &entry)
    }

    /// Unsynced entries, oldest first
    pub fn pending_sync(&self) -> StoreResult<Vec<SyncQueueEntry>> {
        self.list_records(SYNC_QUEUE, "timestamp", None)
            .map(|entries: Vec<SyncQueueEntry>| entries.into_iter().filter(|e| !e.synced).collect())
    }

    /// Entries recorded for one document, oldest first
    pub fn sync_entries_for(&self, document_id: &str) -> StoreResult<Vec<SyncQueueEntry>> {
        let mut entries: Vec<SyncQueueEntry> = self.list_records(
            SYNC_QUEUE,
            "documentId",
            Some(&Value::String(document_id.to_string())),
        )?;
        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::clock::ManualClock;
    use crate::store::{DocumentStore, MemoryStore};
    use std::rc::Rc;

    #[test]
    fn test_entries_are_unsynced_and_per_document() {
        let clock = Rc::new(ManualClock::new(5));
        let mut store = DocumentStore::with_clock(MemoryStore::new(), clock.clone());
        let a = store.create_document(Some("a"), None).unwrap();
        clock.advance(1);
        store.create_document(Some("b"), None).unwrap();

        let pending = store.pending_sync().unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|e| !e.synced && e.id.starts_with("sync_")));

        let for_a = store.sync_entries_for(&a.id).unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].document_id, a.id);
    }
}
