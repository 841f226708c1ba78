use super::{DocumentStore, KeyValueStore, VERSIONS};
use crate::error::StoreResult;
use crate::ids::{generate_id, VERSION_PREFIX};
use crate::model::{DebateDocument, DocumentVersion};
use serde_json::Value;
use tracing::debug;

impl<S: KeyValueStore> DocumentStore<S> {
    /// Snapshot `document` and evict the oldest snapshots beyond the per-document limit
    pub fn create_snapshot(
        &mut self,
        document: &DebateDocument,
        label: Option<&str>,
    ) -> StoreResult<DocumentVersion> {
        let timestamp = self.now();
        let version = DocumentVersion {
            id: generate_id(VERSION_PREFIX, timestamp),
            document_id: document.id.clone(),
            title: document.title.clone(),
            content: document.content.clone(),
            annotations: document.annotations.clone(),
            timestamp,
            label: label.map(str::to_string),
        };

        self.put_record(VERSIONS, &version.id, &version)?;
        debug!(document = %document.id, version = %version.id, "created snapshot");
        self.evict_old_versions(&document.id)?;
        Ok(version)
    }

    /// Snapshots of a document, newest first
    pub fn list_versions(&self, document_id: &str) -> StoreResult<Vec<DocumentVersion>> {
        let mut versions: Vec<DocumentVersion> = self.list_records(
            VERSIONS,
            "documentId",
            Some(&Value::String(document_id.to_string())),
        )?;
        versions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(versions)
    }

    pub fn get_version(&self, version_id: &str) -> StoreResult<Option<DocumentVersion>> {
        self.get_record(VERSIONS, version_id)
    }

    pub fn delete_version(&mut self, version_id: &str) -> StoreResult<bool> {
        self.store.delete(VERSIONS, version_id)
    }

    /// Returns how many snapshots were removed
    pub fn delete_all_versions(&mut self, document_id: &str) -> StoreResult<usize> {
        let versions = self.list_versions(document_id)?;
        for version in &versions {
            self.store.delete(VERSIONS, &version.id)?;
        }
        Ok(versions.len())
    }

    /// Returns the relabelled snapshot, or `None` if it does not exist
    pub fn update_version_label(
        &mut self,
        version_id: &str,
        label: &str,
    ) -> StoreResult<Option<DocumentVersion>> {
        let Some(mut version) = self.get_version(version_id)? else {
            return Ok(None);
        };
        version.label = Some(label.to_string());
        self.put_record(VERSIONS, version_id, &version)?;
        Ok(Some(version))
    }

    fn evict_old_versions(&mut self, document_id: &str) -> StoreResult<()> {
        let versions = self.list_versions(document_id)?;
        if versions.len() <= self.max_versions {
            return Ok(());
        }
        for old in &versions[self.max_versions..] {
            debug!(version = %old.id, "evicting snapshot");
            self.store.delete(VERSIONS, &old.id)?;
        }
        Ok(())
    }
}
