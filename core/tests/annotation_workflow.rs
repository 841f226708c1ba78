// End-to-end annotation flows over the example debate and a file-backed store

use dissector_core::catalog::{Catalog, TagKind};
use dissector_core::clock::ManualClock;
use dissector_core::example_document::{example_document, EXAMPLE_DOCUMENT_TITLE};
use dissector_core::richtext::{resolve_display, AnnotatedDocument, AnnotatedEditor};
use dissector_core::session::{EditorSession, SessionSettings};
use dissector_core::store::{DocumentStore, FileStore};
use std::rc::Rc;
use tempfile::TempDir;

fn char_offset(doc: &AnnotatedDocument, needle: &str) -> (usize, usize) {
    let plain = doc.to_plain_text();
    let byte = plain.find(needle).unwrap();
    let start = plain[..byte].chars().count();
    (start, start + needle.chars().count())
}

fn file_session(dir: &TempDir, clock: Rc<ManualClock>) -> EditorSession<FileStore> {
    let store = DocumentStore::with_clock(FileStore::new(dir.path()), clock);
    EditorSession::new(store, SessionSettings::default())
}

#[test]
fn test_annotations_survive_reload() {
    let dir = TempDir::new().unwrap();
    let clock = Rc::new(ManualClock::new(1_700_000_000_000));
    let catalog = Catalog::builtin();

    let id = {
        let mut session = file_session(&dir, clock.clone());
        let id = session
            .new_document(Some(EXAMPLE_DOCUMENT_TITLE), Some(example_document(0)))
            .unwrap();

        let (start, end) = char_offset(session.editor().document(), "combat climate change");
        session.editor_mut().select_offsets(start, end);
        let fear = catalog.find(TagKind::Rhetoric, "appeal-to-fear").unwrap();
        let range = session.editor_mut().apply_tag(TagKind::Rhetoric, fear).unwrap();
        assert_eq!((range.start, range.end), (start, end));
        session.note_change();

        clock.advance(1_000);
        assert!(session.save_now(false).unwrap());
        session.close();
        id
    };

    let mut session = file_session(&dir, clock.clone());
    assert!(session.resume().unwrap());
    assert_eq!(session.document_id(), Some(id.as_str()));
    assert_eq!(session.title(), EXAMPLE_DOCUMENT_TITLE);

    let doc = session.editor().document();
    let used = doc.used_tags();
    assert_eq!(used.rhetoric, vec!["appeal-to-fear"]);
    assert_eq!(used.fallacies.len(), 4);
    assert_eq!(doc.total_mark_count(), 5);

    let summary = &session.store().list_summaries().unwrap()[0];
    assert_eq!(summary.annotation_count, 5);
    assert!(summary.preview.ends_with("..."));
}

#[test]
fn test_same_id_in_both_taxonomies() {
    let catalog = Catalog::builtin();
    let mut editor = AnnotatedEditor::with_document(example_document(0));
    let (start, end) = char_offset(editor.document(), "My friend who works at a gas station");
    editor.select_offsets(start, end);

    let rhetoric = catalog.find(TagKind::Rhetoric, "appeal-to-authority").unwrap();
    assert!(editor.apply_tag(TagKind::Rhetoric, rhetoric).is_some());

    let marks = editor.marks_at_cursor();
    assert_eq!(marks.fallacy_marks.len(), 1);
    assert_eq!(marks.rhetoric_marks.len(), 1);

    assert!(editor.remove_tag(TagKind::Fallacy, "appeal-to-authority"));
    let marks = editor.marks_at_cursor();
    assert!(marks.fallacy_marks.is_empty());
    assert_eq!(marks.rhetoric_marks[0].rhetoric_id, "appeal-to-authority");
}

#[test]
fn test_navigation_visits_every_marked_run() {
    let mut editor = AnnotatedEditor::with_document(example_document(0));
    let expected = [
        "So you want to destroy the entire oil industry and put millions of people out of work?",
        "Besides, you drive a car yourself, so you're being hypocritical.",
        "Either we keep using fossil fuels or the economy collapses.",
        "My friend who works at a gas station says green energy doesn't work.",
    ];

    for text in expected.iter().chain(expected.iter().take(1)) {
        assert!(editor.select_next(None));
        assert_eq!(editor.selected_text(), *text);
    }

    // From an unmarked run past the last mark, navigation wraps
    let end = editor.document().end_position();
    editor.set_cursor(end);
    assert!(editor.select_next(None));
    assert_eq!(editor.selected_text(), expected[0]);

    assert!(editor.select_previous(None));
    assert_eq!(editor.selected_text(), expected[3]);
}

#[test]
fn test_overflow_badges_in_example() {
    let catalog = Catalog::builtin();
    let clock = Rc::new(ManualClock::new(500));
    let mut editor = AnnotatedEditor::with_clock(example_document(100), clock);
    let (start, end) = char_offset(editor.document(), "Either we keep using fossil fuels");
    editor.select_offsets(start, end);
    let urgency = catalog.find(TagKind::Rhetoric, "urgency").unwrap();
    editor.apply_tag(TagKind::Rhetoric, urgency).unwrap();

    let (_, run) = editor.document().run_at(editor.document().position_at(start)).unwrap();
    let display = resolve_display(run, &catalog);
    assert_eq!(display.color.as_deref(), Some(urgency.color));
    assert_eq!(display.badge_label().as_deref(), Some("+1"));
    let names: Vec<&str> = display.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["False Dilemma", "Urgency"]);
}

#[test]
fn test_fallacy_counts_summary() {
    let doc = example_document(0);
    let summary = doc
        .count_by_tag(TagKind::Fallacy)
        .iter()
        .map(|(id, count)| format!("{id}: {count}"))
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(summary, @r"
    appeal-to-authority: 1
    false-dilemma: 1
    straw-man: 1
    tu-quoque: 1
    ");
}
