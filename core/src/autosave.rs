use crate::clock::Timestamp;
use crate::content::ContentProvider;
use crate::error::{StoreError, StoreResult};
use crate::richtext::AnnotatedDocument;
use crate::store::{DocumentStore, KeyValueStore};

/// State management for auto-save functionality
#[derive(Debug, Clone)]
pub struct AutoSaveState {
    /// When the content was last changed
    pub last_change_time: Option<Timestamp>,
    /// When the content was last successfully saved
    pub last_save_time: Option<Timestamp>,
    /// First unsaved change since the last save
    pub dirty_since: Option<Timestamp>,
    /// Whether a save operation is currently in progress
    pub is_saving: bool,
    /// Whether a save is pending (for debounce)
    pub pending_save: bool,
    /// Content as last loaded or saved, to detect changes
    pub original_content: AnnotatedDocument,
    pub original_title: String,
    /// Document being edited
    pub current_document: Option<String>,
}

impl AutoSaveState {
    pub fn new() -> Self {
        AutoSaveState {
            last_change_time: None,
            last_save_time: None,
            dirty_since: None,
            is_saving: false,
            pending_save: false,
            original_content: AnnotatedDocument::new(),
            original_title: String::new(),
            current_document: None,
        }
    }

    /// Mark that content has changed
    pub fn mark_changed(&mut self, now: Timestamp) {
        self.last_change_time = Some(now);
        self.dirty_since.get_or_insert(now);
        self.pending_save = true;
    }

    /// Reset state when opening another document
    pub fn reset_for_document(&mut self, id: &str, title: &str, content: &AnnotatedDocument) {
        self.current_document = Some(id.to_string());
        self.original_content = content.clone();
        self.original_title = title.to_string();
        self.last_change_time = None;
        self.last_save_time = None;
        self.dirty_since = None;
        self.is_saving = false;
        self.pending_save = false;
    }

    /// Nothing is saved without a document to save into
    pub fn should_save(&self) -> bool {
        self.current_document.is_some()
    }

    /// Whether `content`/`title` differ from what was last loaded or saved
    pub fn is_dirty(&self, content: &AnnotatedDocument, title: &str) -> bool {
        title != self.original_title || content != &self.original_content
    }

    /// A save is due once `interval_ms` passed since the first unsaved change
    pub fn save_due(&self, now: Timestamp, interval_ms: u64) -> bool {
        if !self.pending_save || self.is_saving {
            return false;
        }
        match self.dirty_since {
            Some(since) => now.saturating_sub(since) >= interval_ms as i64,
            None => false,
        }
    }

    /// Get the status text for display
    pub fn status_text(&self, now: Timestamp) -> String {
        if self.is_saving {
            return "Saving...".to_string();
        }

        if self.pending_save {
            "not saved".to_string()
        } else if let Some(save_time) = self.last_save_time {
            format_time_since(save_time, now)
        } else {
            String::new()
        }
    }

    /// Save the editor content into the current document.
    ///
    /// Returns whether anything was written. With `snapshot_existing` the previously
    /// stored revision is kept as a version first.
    pub fn trigger_save<T: ContentProvider + ?Sized, S: KeyValueStore>(
        &mut self,
        editor: &T,
        title: &str,
        store: &mut DocumentStore<S>,
        snapshot_existing: bool,
    ) -> StoreResult<bool> {
        let Some(id) = self.current_document.clone() else {
            self.pending_save = false;
            return Ok(false);
        };

        // Don't save if already saving
        if self.is_saving {
            return Ok(false);
        }

        let current_content = editor.content();
        if !self.is_dirty(&current_content, title) {
            self.pending_save = false;
            self.dirty_since = None;
            return Ok(false);
        }

        self.is_saving = true;
        self.pending_save = false;

        let result = match store.get_document(&id) {
            Ok(Some(mut doc)) => {
                doc.content = current_content.clone();
                doc.title = title.to_string();
                store.save_document(&doc, snapshot_existing)
            }
            Ok(None) => Err(StoreError::DocumentNotFound(id)),
            Err(e) => Err(e),
        };

        self.is_saving = false;
        match result {
            Ok(saved) => {
                self.last_save_time = Some(saved.updated_at);
                self.original_content = current_content;
                self.original_title = title.to_string();
                self.dirty_since = None;
                Ok(true)
            }
            Err(e) => {
                // Leave the change pending so the next tick retries
                self.pending_save = true;
                Err(e)
            }
        }
    }
}

impl Default for AutoSaveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the time since `saved_at` as a human-readable string
pub fn format_time_since(saved_at: Timestamp, now: Timestamp) -> String {
    if now < saved_at {
        return "saved (time error)".to_string();
    }
    let secs = (now - saved_at) / 1000;

    if secs < 60 {
        "saved just now".to_string()
    } else if secs < 3600 {
        let mins = secs / 60;
        if mins == 1 {
            "saved 1 min ago".to_string()
        } else {
            format!("saved {} min ago", mins)
        }
    } else if secs < 86400 {
        let hours = secs / 3600;
        if hours == 1 {
            "saved 1 hour ago".to_string()
        } else {
            format!("saved {} hours ago", hours)
        }
    } else if secs < 604800 {
        let days = secs / 86400;
        if days == 1 {
            "saved 1 day ago".to_string()
        } else {
            format!("saved {} days ago", days)
        }
    } else {
        format_absolute_date(saved_at)
    }
}

/// Format a time as an absolute date (YYYY-MM-DD)
fn format_absolute_date(time: Timestamp) -> String {
    match chrono::DateTime::from_timestamp_millis(time) {
        Some(date) => format!("saved {}", date.format("%Y-%m-%d")),
        None => "saved (unknown date)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::richtext::{AnnotatedEditor, DocumentPosition};
    use crate::store::MemoryStore;
    use std::rc::Rc;

    const MIN: i64 = 60_000;

    #[test]
    fn test_autosave_state_new() {
        let state = AutoSaveState::new();
        assert!(state.last_change_time.is_none());
        assert!(state.last_save_time.is_none());
        assert!(!state.is_saving);
        assert!(!state.pending_save);
        assert!(!state.should_save());
    }

    #[test]
    fn test_mark_changed() {
        let mut state = AutoSaveState::new();
        state.mark_changed(10);
        state.mark_changed(20);
        assert_eq!(state.last_change_time, Some(20));
        assert_eq!(state.dirty_since, Some(10));
        assert!(state.pending_save);
        assert_eq!(state.status_text(20), "not saved");
    }

    #[test]
    fn test_save_due_after_interval() {
        let mut state = AutoSaveState::new();
        assert!(!state.save_due(100_000, 30_000));
        state.mark_changed(1_000);
        assert!(!state.save_due(30_999, 30_000));
        assert!(state.save_due(31_000, 30_000));
    }

    #[test]
    fn test_format_time_just_now() {
        assert_eq!(format_time_since(1_000, 1_500), "saved just now");
    }

    #[test]
    fn test_format_time_minutes() {
        assert_eq!(format_time_since(0, 150_000), "saved 2 min ago");
        assert_eq!(format_time_since(0, MIN), "saved 1 min ago");
    }

    #[test]
    fn test_format_time_hours_and_days() {
        assert_eq!(format_time_since(0, 120 * MIN), "saved 2 hours ago");
        assert_eq!(format_time_since(0, 26 * 60 * MIN), "saved 1 day ago");
    }

    #[test]
    fn test_format_absolute_date_after_a_week() {
        // 2024-03-01T00:00:00Z
        let saved = 1_709_251_200_000;
        assert_eq!(format_time_since(saved, saved + 8 * 24 * 60 * MIN), "saved 2024-03-01");
    }

    #[test]
    fn test_trigger_save_writes_only_changes() {
        let clock = Rc::new(ManualClock::new(1_000));
        let mut store = DocumentStore::with_clock(MemoryStore::new(), clock.clone());
        let doc = store.create_document(Some("Debate"), None).unwrap();

        let mut editor = AnnotatedEditor::with_document(doc.content.clone());
        let mut state = AutoSaveState::new();
        state.reset_for_document(&doc.id, &doc.title, &doc.content);
        assert!(!state.trigger_save(&editor, "Debate", &mut store, false).unwrap());

        editor.set_cursor(DocumentPosition::start());
        editor.insert_text("Opening statement").unwrap();
        state.mark_changed(clock.now_millis());
        clock.advance(5);
        assert!(state.trigger_save(&editor, "Debate", &mut store, false).unwrap());
        assert!(!state.pending_save);
        assert_eq!(state.status_text(clock.now_millis()), "saved just now");

        let stored = store.get_document(&doc.id).unwrap().unwrap();
        assert_eq!(stored.content.to_plain_text(), "Opening statement");
        assert!(!state.trigger_save(&editor, "Debate", &mut store, false).unwrap());
    }

    #[test]
    fn test_trigger_save_missing_document_keeps_pending() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let editor = AnnotatedEditor::new();
        let mut state = AutoSaveState::new();
        state.reset_for_document("doc_gone", "t", &AnnotatedDocument::new());
        state.mark_changed(1);
        let err = state.trigger_save(&editor, "renamed", &mut store, false).unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(_)));
        assert!(state.pending_save);
        assert!(!state.is_saving);
    }
}
