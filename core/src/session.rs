// One open document: the editor, its stored metadata, and the save and snapshot
// bookkeeping that goes with it.

use crate::autosave::AutoSaveState;
use crate::clock::{Clock, Timestamp};
use crate::config::Config;
use crate::content::ContentLoader;
use crate::error::{StoreError, StoreResult};
use crate::model::{DebateDocument, PreferencesUpdate};
use crate::richtext::{AnnotatedDocument, AnnotatedEditor};
use crate::store::{DocumentStore, KeyValueStore};
use tracing::{debug, warn};

pub const RESTORE_LABEL: &str = "Before restore";

/// Timing knobs for saving and snapshotting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub autosave_enabled: bool,
    pub autosave_interval_ms: u64,
    pub snapshot_interval_ms: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        SessionSettings {
            autosave_enabled: config.autosave.enabled,
            autosave_interval_ms: config.autosave.interval_ms,
            snapshot_interval_ms: config.versions.snapshot_interval_ms,
        }
    }
}

pub struct EditorSession<S: KeyValueStore> {
    store: DocumentStore<S>,
    editor: AnnotatedEditor,
    document: Option<DebateDocument>,
    title: String,
    autosave: AutoSaveState,
    last_snapshot_at: Option<Timestamp>,
    load_error: Option<String>,
    settings: SessionSettings,
}

impl<S: KeyValueStore> EditorSession<S> {
    pub fn new(store: DocumentStore<S>, settings: SessionSettings) -> Self {
        let editor = AnnotatedEditor::with_clock(AnnotatedDocument::new(), store.clock().clone());
        EditorSession {
            store,
            editor,
            document: None,
            title: String::new(),
            autosave: AutoSaveState::new(),
            last_snapshot_at: None,
            load_error: None,
            settings,
        }
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DocumentStore<S> {
        &mut self.store
    }

    pub fn editor(&self) -> &AnnotatedEditor {
        &self.editor
    }

    /// Callers that change content through the editor must follow up with
    /// [`EditorSession::note_change`].
    pub fn editor_mut(&mut self) -> &mut AnnotatedEditor {
        &mut self.editor
    }

    pub fn document(&self) -> Option<&DebateDocument> {
        self.document.as_ref()
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document.as_ref().map(|d| d.id.as_str())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn autosave(&self) -> &AutoSaveState {
        &self.autosave
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn last_snapshot_at(&self) -> Option<Timestamp> {
        self.last_snapshot_at
    }

    /// Set when the last open failed; the editor then holds an empty document
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    fn now(&self) -> Timestamp {
        self.store.clock().now_millis()
    }

    /// Open a stored document. Returns `Ok(false)` if it does not exist.
    ///
    /// A storage failure leaves the session in the load-failed state with an
    /// empty document, and is returned as well.
    pub fn open(&mut self, id: &str) -> StoreResult<bool> {
        let document = match self.store.get_document(id) {
            Ok(Some(document)) => document,
            Ok(None) => return Ok(false),
            Err(err) => {
                warn!(id, "failed to load document: {err}");
                self.enter_load_failed(err.to_string());
                return Err(err);
            }
        };

        self.editor.load_content(document.content.clone());
        self.title = document.title.clone();
        self.autosave
            .reset_for_document(&document.id, &document.title, &document.content);
        self.last_snapshot_at = None;
        self.load_error = None;
        debug!(id, "opened document");

        let update = PreferencesUpdate {
            last_document_id: Some(Some(document.id.clone())),
            ..Default::default()
        };
        if let Err(err) = self.store.update_preferences(update) {
            warn!("failed to remember last document: {err}");
        }
        self.document = Some(document);
        Ok(true)
    }

    /// Reopen the document recorded in the preferences, if it still exists
    pub fn resume(&mut self) -> StoreResult<bool> {
        let Some(id) = self.store.get_preferences()?.last_document_id else {
            return Ok(false);
        };
        if self.open(&id)? {
            return Ok(true);
        }
        self.store.update_preferences(PreferencesUpdate {
            last_document_id: Some(None),
            ..Default::default()
        })?;
        Ok(false)
    }

    /// Create a document and open it. Returns its id.
    pub fn new_document(
        &mut self,
        title: Option<&str>,
        content: Option<AnnotatedDocument>,
    ) -> StoreResult<String> {
        self.close();
        let document = self.store.create_document(title, content)?;
        let id = document.id.clone();
        if !self.open(&id)? {
            return Err(StoreError::DocumentNotFound(id));
        }
        Ok(id)
    }

    pub fn rename(&mut self, title: &str) {
        if title == self.title {
            return;
        }
        self.title = title.to_string();
        self.note_change();
    }

    pub fn note_change(&mut self) {
        let now = self.now();
        self.autosave.mark_changed(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_dirty(self.editor.document(), &self.title)
    }

    fn snapshot_due(&self, now: Timestamp) -> bool {
        match self.last_snapshot_at {
            None => true,
            Some(at) => now.saturating_sub(at) >= self.settings.snapshot_interval_ms as i64,
        }
    }

    /// Write pending changes. The stored previous revision is snapshotted first
    /// when forced, when this session has not snapshotted yet, or when the
    /// snapshot interval elapsed.
    pub fn save_now(&mut self, force_snapshot: bool) -> StoreResult<bool> {
        let now = self.now();
        let snapshot = force_snapshot || self.snapshot_due(now);
        let saved = self
            .autosave
            .trigger_save(&self.editor, &self.title, &mut self.store, snapshot)?;
        if !saved {
            return Ok(false);
        }

        if snapshot {
            self.last_snapshot_at = Some(now);
        }
        debug!(snapshot, "saved document");
        if let Some(document) = &mut self.document {
            document.title = self.title.clone();
            document.content = self.editor.document().clone();
            if let Some(at) = self.autosave.last_save_time {
                document.updated_at = at;
            }
        }
        Ok(true)
    }

    /// Save if changes have been pending for the autosave interval.
    /// Failures are logged and retried on a later tick.
    pub fn autosave_tick(&mut self) -> bool {
        if !self.settings.autosave_enabled {
            return false;
        }
        let now = self.now();
        if !self.autosave.save_due(now, self.settings.autosave_interval_ms) {
            return false;
        }
        match self.save_now(false) {
            Ok(saved) => saved,
            Err(err) => {
                warn!("autosave failed: {err}");
                false
            }
        }
    }

    /// Replace the open document with a stored version.
    ///
    /// The current state is saved and snapshotted first. Returns `Ok(false)` if
    /// the version does not exist or belongs to another document.
    pub fn restore_version(&mut self, version_id: &str) -> StoreResult<bool> {
        let Some(current_id) = self.document_id().map(str::to_string) else {
            return Ok(false);
        };
        let Some(version) = self.store.get_version(version_id)? else {
            return Ok(false);
        };
        if version.document_id != current_id {
            return Ok(false);
        }

        self.save_now(false)?;
        let Some(current) = self.store.get_document(&current_id)? else {
            return Err(StoreError::DocumentNotFound(current_id));
        };
        self.store.create_snapshot(&current, Some(RESTORE_LABEL))?;
        self.last_snapshot_at = Some(self.now());

        self.editor.load_content(version.content);
        self.title = version.title;
        self.note_change();
        self.save_now(false)?;
        debug!(version = version_id, "restored version");
        Ok(true)
    }

    /// Flush pending changes and forget the document. A failed flush is only logged.
    pub fn close(&mut self) {
        if self.document.is_some() && self.is_dirty() {
            if let Err(err) = self.save_now(false) {
                warn!("failed to save document on close: {err}");
            }
        }
        self.document = None;
        self.title.clear();
        self.autosave = AutoSaveState::new();
        self.last_snapshot_at = None;
        self.editor.load_content(AnnotatedDocument::new());
    }

    fn enter_load_failed(&mut self, message: String) {
        self.document = None;
        self.title.clear();
        self.autosave = AutoSaveState::new();
        self.last_snapshot_at = None;
        self.editor.load_content(AnnotatedDocument::new());
        self.load_error = Some(message);
    }
}
