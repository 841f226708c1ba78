// Content access and loading.
// Stored content is untrusted JSON: anything that is not a well-formed block list is
// replaced wholesale by the canonical empty document, never partially repaired.

use crate::richtext::marks::dedup_by_tag;
use crate::richtext::{
    AnnotatedDocument, AnnotatedEditor, AnnotationMark, Block, BlockKind, FallacyMark,
    RhetoricMark, TextRun, TextStyle,
};
use crate::ids::MARK_PREFIX;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Provides read access to the current document content
pub trait ContentProvider {
    fn content(&self) -> AnnotatedDocument;
}

impl ContentProvider for AnnotatedEditor {
    fn content(&self) -> AnnotatedDocument {
        self.document().clone()
    }
}

/// Replaces the content of an editor-like value
pub trait ContentLoader {
    fn load_content(&mut self, document: AnnotatedDocument);
}

impl ContentLoader for AnnotatedEditor {
    fn load_content(&mut self, document: AnnotatedDocument) {
        self.set_document(document);
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRun {
    text: String,
    #[serde(default)]
    bold: Option<bool>,
    #[serde(default)]
    italic: Option<bool>,
    #[serde(default)]
    underline: Option<bool>,
    #[serde(default)]
    strikethrough: Option<bool>,
    #[serde(default)]
    fallacy_marks: Option<Vec<FallacyMark>>,
    #[serde(default)]
    rhetoric_marks: Option<Vec<RhetoricMark>>,
    // Single-valued fields written before runs carried mark lists
    #[serde(default)]
    fallacy_id: Option<String>,
    #[serde(default)]
    fallacy_color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredBlock {
    #[serde(rename = "type")]
    kind: BlockKind,
    children: Vec<StoredRun>,
}

/// What happened while loading stored content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The content was unusable and the canonical empty document was substituted
    pub canonicalized: bool,
    /// Runs whose legacy single-valued fallacy fields became a mark
    pub migrated_runs: usize,
    /// Marks dropped because their tag already appeared earlier in the same run
    pub dropped_duplicates: usize,
}

/// Load stored content, canonicalizing anything structurally invalid
pub fn load_document(value: &Value) -> AnnotatedDocument {
    load_document_with_report(value).0
}

pub fn load_document_with_report(value: &Value) -> (AnnotatedDocument, LoadReport) {
    let mut report = LoadReport::default();

    let blocks = match value {
        Value::Array(items) if !items.is_empty() => {
            Vec::<StoredBlock>::deserialize(value).map_err(|err| err.to_string())
        }
        Value::Array(_) => Err("empty block list".to_string()),
        Value::Null => Err("no content".to_string()),
        _ => Err("content is not a block list".to_string()),
    };

    let blocks = match blocks {
        Ok(blocks) if blocks.iter().all(|b| !b.children.is_empty()) => blocks,
        Ok(_) => {
            warn!("stored block without children, using empty document");
            report.canonicalized = true;
            return (AnnotatedDocument::new(), report);
        }
        Err(reason) => {
            if !value.is_null() {
                warn!(%reason, "invalid stored content, using empty document");
            }
            report.canonicalized = true;
            return (AnnotatedDocument::new(), report);
        }
    };

    let blocks = blocks
        .into_iter()
        .enumerate()
        .map(|(block_index, block)| {
            let mut legacy = None;
            Block {
                kind: block.kind,
                children: block
                    .children
                    .into_iter()
                    .enumerate()
                    .map(|(run_index, run)| {
                        let origin = (block_index, run_index);
                        convert_run(run, origin, &mut legacy, &mut report)
                    })
                    .collect(),
            }
        })
        .collect();

    (AnnotatedDocument::from_blocks(blocks), report)
}

/// A migrated legacy annotation that the following run may continue
struct LegacySpan {
    fallacy_id: String,
    color: String,
    mark_id: String,
}

/// Id for a migrated legacy mark, stable across loads of the same content
fn legacy_mark_id((block_index, run_index): (usize, usize)) -> String {
    format!("{MARK_PREFIX}_0_legacy{block_index}x{run_index}")
}

/// Adjacent runs of one block carrying the same legacy fields share one mark id.
fn convert_run(
    stored: StoredRun,
    origin: (usize, usize),
    legacy: &mut Option<LegacySpan>,
    report: &mut LoadReport,
) -> TextRun {
    let style = TextStyle {
        bold: stored.bold.unwrap_or(false),
        italic: stored.italic.unwrap_or(false),
        underline: stored.underline.unwrap_or(false),
        strikethrough: stored.strikethrough.unwrap_or(false),
    };

    let mut fallacy_marks = stored.fallacy_marks.unwrap_or_default();
    let rhetoric_marks = stored.rhetoric_marks.unwrap_or_default();

    if fallacy_marks.is_empty()
        && let (Some(fallacy_id), Some(color)) = (stored.fallacy_id, stored.fallacy_color)
    {
        let mark_id = match legacy.as_ref() {
            Some(span) if span.fallacy_id == fallacy_id && span.color == color => {
                span.mark_id.clone()
            }
            _ => legacy_mark_id(origin),
        };
        fallacy_marks.push(FallacyMark::create(
            mark_id.clone(),
            fallacy_id.clone(),
            color.clone(),
            0,
        ));
        *legacy = Some(LegacySpan {
            fallacy_id,
            color,
            mark_id,
        });
        report.migrated_runs += 1;
    } else {
        *legacy = None;
    }

    let total = fallacy_marks.len() + rhetoric_marks.len();
    let fallacy_marks = dedup_by_tag(fallacy_marks);
    let rhetoric_marks = dedup_by_tag(rhetoric_marks);
    report.dropped_duplicates += total - fallacy_marks.len() - rhetoric_marks.len();

    TextRun {
        text: stored.text,
        style,
        fallacy_marks,
        rhetoric_marks,
    }
}

impl<'de> Deserialize<'de> for AnnotatedDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(load_document(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_content_is_canonicalized() {
        let canonical = AnnotatedDocument::new();
        for value in [
            json!(null),
            json!([]),
            json!({}),
            json!("text"),
            json!([{ "type": "paragraph" }]),
            json!([{ "type": "paragraph", "children": [] }]),
            json!([{ "type": "paragraph", "children": [{ "bold": true }] }]),
            json!([{ "type": "table", "children": [{ "text": "x" }] }]),
            json!([{ "type": "paragraph", "children": [{ "text": "ok" }] }, 42]),
        ] {
            let (doc, report) = load_document_with_report(&value);
            assert_eq!(doc, canonical, "input: {}", value);
            assert!(report.canonicalized);
        }
    }

    #[test]
    fn test_valid_content_loads() {
        let value = json!([
            { "type": "heading-one", "children": [{ "text": "Title", "bold": true }] },
            { "type": "paragraph", "children": [
                { "text": "a claim", "fallacyMarks": [
                    { "id": "m1", "fallacyId": "straw-man", "color": "#FF6B6B", "appliedAt": 5 }
                ] },
                { "text": " and more" }
            ] }
        ]);
        let (doc, report) = load_document_with_report(&value);
        assert!(!report.canonicalized);
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks()[0].kind, BlockKind::HeadingOne);
        assert!(doc.blocks()[0].children[0].style.bold);
        assert_eq!(doc.blocks()[1].children[0].fallacy_marks[0].id, "m1");

        // Loading what we write gives the same document back
        let written = serde_json::to_value(&doc).unwrap();
        assert_eq!(load_document(&written), doc);
    }

    #[test]
    fn test_legacy_fields_become_a_mark() {
        let value = json!([{ "type": "paragraph", "children": [
            { "text": "old", "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" }
        ] }]);
        let (doc, report) = load_document_with_report(&value);
        assert_eq!(report.migrated_runs, 1);

        let run = &doc.blocks()[0].children[0];
        assert_eq!(run.fallacy_marks.len(), 1);
        assert_eq!(run.fallacy_marks[0].fallacy_id, "ad-hominem");
        assert_eq!(run.fallacy_marks[0].color, "#4ECDC4");
        assert_eq!(run.fallacy_marks[0].applied_at, 0);
        assert!(run.fallacy_marks[0].id.starts_with("mark_0_"));

        let written = serde_json::to_value(&doc).unwrap();
        assert!(written[0]["children"][0].get("fallacyId").is_none());
    }

    #[test]
    fn test_legacy_span_across_styled_runs_shares_one_id() {
        let value = json!([
            { "type": "paragraph", "children": [
                { "text": "you ", "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" },
                { "text": "always", "bold": true, "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" },
                { "text": " lie", "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" },
                { "text": " so " },
                { "text": "again", "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" }
            ] },
            { "type": "paragraph", "children": [
                { "text": "next", "fallacyId": "ad-hominem", "fallacyColor": "#4ECDC4" }
            ] }
        ]);
        let doc = load_document(&value);
        let ids: Vec<&str> = doc
            .blocks()
            .iter()
            .flat_map(|b| b.children.iter())
            .filter_map(|run| run.fallacy_marks.first())
            .map(|mark| mark.id.as_str())
            .collect();

        assert_eq!(ids.len(), 5);
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);
        assert_ne!(ids[2], ids[3]);
        assert_ne!(ids[3], ids[4]);
        assert_eq!(doc.annotation_index().len(), 3);

        assert_eq!(load_document(&value), doc);
    }

    #[test]
    fn test_legacy_fields_ignored_when_marks_present() {
        let value = json!([{ "type": "paragraph", "children": [{
            "text": "both",
            "fallacyId": "ad-hominem",
            "fallacyColor": "#4ECDC4",
            "fallacyMarks": [{ "id": "m1", "fallacyId": "straw-man", "color": "#FF6B6B", "appliedAt": 9 }]
        }] }]);
        let doc = load_document(&value);
        let run = &doc.blocks()[0].children[0];
        assert_eq!(run.fallacy_marks.len(), 1);
        assert_eq!(run.fallacy_marks[0].fallacy_id, "straw-man");
    }

    #[test]
    fn test_duplicate_tags_within_run_are_dropped() {
        let value = json!([{ "type": "paragraph", "children": [{
            "text": "dup",
            "rhetoricMarks": [
                { "id": "r1", "rhetoricId": "urgency", "color": "#F59F00", "appliedAt": 1 },
                { "id": "r2", "rhetoricId": "urgency", "color": "#F59F00", "appliedAt": 2 }
            ]
        }] }]);
        let (doc, report) = load_document_with_report(&value);
        assert_eq!(report.dropped_duplicates, 1);
        assert_eq!(doc.blocks()[0].children[0].rhetoric_marks[0].id, "r1");
    }

    #[test]
    fn test_deserialize_never_fails() {
        let doc: AnnotatedDocument = serde_json::from_str("{\"not\": \"blocks\"}").unwrap();
        assert!(doc.is_blank());
    }

    #[test]
    fn test_loader_resets_editor() {
        let mut editor = AnnotatedEditor::new();
        editor.load_content(AnnotatedDocument::with_paragraph("loaded"));
        assert_eq!(editor.content().to_plain_text(), "loaded");
        assert!(!editor.can_undo());
    }
}
