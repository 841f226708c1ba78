use crate::clock::Timestamp;
use crate::richtext::AnnotatedDocument;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TITLE: &str = "Untitled Debate";
pub const PREVIEW_LENGTH: usize = 100;

/// Stored map of summary annotation records, keyed by annotation id.
///
/// Kept only so older records survive a load/save cycle unchanged; summaries are
/// derived from the embedded marks with `AnnotatedDocument::annotation_index`.
pub type LegacyAnnotations = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: AnnotatedDocument,
    #[serde(default)]
    pub annotations: LegacyAnnotations,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl DebateDocument {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            preview: preview_text(&self.content, PREVIEW_LENGTH),
            created_at: self.created_at,
            updated_at: self.updated_at,
            annotation_count: self.content.annotation_index().len(),
        }
    }
}

/// Row of the document list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub annotation_count: usize,
}

/// Run texts concatenated without separators, cut at `max_chars` with "..." appended
pub fn preview_text(content: &AnnotatedDocument, max_chars: usize) -> String {
    let mut text = String::new();
    let mut len = 0;
    'blocks: for block in content.blocks() {
        for run in &block.children {
            if len >= max_chars {
                break 'blocks;
            }
            text.push_str(&run.text);
            len += run.len();
        }
    }

    if len > max_chars {
        let mut preview: String = text.chars().take(max_chars).collect();
        preview.push_str("...");
        preview
    } else {
        text
    }
}

/// Immutable snapshot of a document; only the label may change later
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: String,
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub content: AnnotatedDocument,
    #[serde(default)]
    pub annotations: LegacyAnnotations,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    pub auto_save: bool,
    /// Milliseconds between autosaves
    pub auto_save_interval: u64,
    pub show_fallacy_panel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_document_id: Option<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            theme: Theme::System,
            auto_save: true,
            auto_save_interval: 30_000,
            show_fallacy_panel: true,
            last_document_id: None,
        }
    }
}

/// Partial update of the preferences; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub auto_save: Option<bool>,
    pub auto_save_interval: Option<u64>,
    pub show_fallacy_panel: Option<bool>,
    /// `Some(None)` clears the last document
    pub last_document_id: Option<Option<String>>,
}

impl UserPreferences {
    pub fn merged(mut self, update: PreferencesUpdate) -> Self {
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(auto_save) = update.auto_save {
            self.auto_save = auto_save;
        }
        if let Some(interval) = update.auto_save_interval {
            self.auto_save_interval = interval;
        }
        if let Some(show) = update.show_fallacy_panel {
            self.show_fallacy_panel = show;
        }
        if let Some(last) = update.last_document_id {
            self.last_document_id = last;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
}

/// Outgoing change record for a future remote sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncQueueEntry {
    pub id: String,
    pub document_id: String,
    pub action: SyncAction,
    pub timestamp: Timestamp,
    pub synced: bool,
}
