// Mark mutations against the current selection.
// A missing or collapsed selection is a silent no-op, never an error.

use super::annotated_document::*;
use super::editor::AnnotatedEditor;
use crate::catalog::{Tag, TagKind};
use crate::ids::{generate_id, MARK_PREFIX};
use tracing::{debug, warn};

impl AnnotatedEditor {
    /// Apply `tag` to every run spanned by the selection.
    ///
    /// Returns the absolute range that was tagged, or `None` when the selection is
    /// collapsed or absent, or when any run in it already carries the tag.
    pub fn apply_tag(&mut self, kind: TagKind, tag: &Tag) -> Option<AppliedRange> {
        if tag.kind() != kind {
            warn!(tag = tag.id, %kind, "tag does not belong to the requested taxonomy");
            return None;
        }
        let (start, end) = self.selected_range()?;

        let runs = self.document.runs_in_range(start, end);
        if runs.is_empty() {
            return None;
        }
        if runs.iter().any(|run| run.has_tag(kind, tag.id)) {
            debug!(tag = tag.id, %kind, "tag already applied within selection");
            return None;
        }

        let applied_at = self.clock.now_millis();
        let mark_id = generate_id(MARK_PREFIX, applied_at);
        let changed = self.document.update_runs_in_range(start, end, |run| {
            run.add_mark(kind, &mark_id, tag.id, tag.color, applied_at)
        });
        if !changed {
            return None;
        }

        let range = AppliedRange {
            start: self.document.absolute_offset(start),
            end: self.document.absolute_offset(end),
        };
        debug!(tag = tag.id, %kind, mark = %mark_id, start = range.start, end = range.end, "applied tag");
        self.commit();
        Some(range)
    }

    /// Remove every mark with `tag_id` from the runs spanned by the selection.
    /// Returns whether anything was removed.
    pub fn remove_tag(&mut self, kind: TagKind, tag_id: &str) -> bool {
        let Some((start, end)) = self.selected_range() else {
            return false;
        };
        let removed = self
            .document
            .update_runs_in_range(start, end, |run| run.remove_tag(kind, tag_id) > 0);
        if removed {
            debug!(tag = tag_id, %kind, "removed tag");
            self.commit();
        }
        removed
    }

    /// Strip all fallacy and rhetoric marks from the runs spanned by the selection
    pub fn clear_all_annotations(&mut self) -> bool {
        let Some((start, end)) = self.selected_range() else {
            return false;
        };
        let cleared = self
            .document
            .update_runs_in_range(start, end, |run| run.clear_marks() > 0);
        if cleared {
            debug!("cleared annotations in selection");
            self.commit();
        }
        cleared
    }

    /// Style of the formatting context: the first run overlapping the selection,
    /// or the run at the cursor when collapsed
    fn context_style(&self) -> Option<TextStyle> {
        if let Some((start, end)) = self.selected_range() {
            if let Some(run) = self.document.runs_in_range(start, end).first() {
                return Some(run.style);
            }
        }
        let cursor = self.cursor()?;
        self.document.run_at(cursor).map(|(_, run)| run.style)
    }

    /// Whether a style mark is active in the current formatting context
    pub fn is_style_active(&self, mark: StyleMark) -> bool {
        if !self.has_expanded_selection()
            && let Some(pending) = self.pending_style
        {
            return pending.get(mark);
        }
        self.context_style().is_some_and(|style| style.get(mark))
    }

    /// Toggle a style mark. With a collapsed selection the toggle applies to the next insertion.
    pub fn toggle_style_mark(&mut self, mark: StyleMark) -> bool {
        if self.selection.is_none() {
            return false;
        }
        let active = self.is_style_active(mark);

        let Some((start, end)) = self.selected_range() else {
            let mut style = self
                .pending_style
                .or_else(|| self.context_style())
                .unwrap_or_default();
            style.set(mark, !active);
            self.pending_style = Some(style);
            return true;
        };

        let changed = self.document.update_runs_in_range(start, end, |run| {
            let before = run.style.get(mark);
            run.style.set(mark, !active);
            before == active
        });
        if changed {
            self.commit();
        }
        changed
    }

    /// Whether any block touched by the selection has `kind`
    pub fn is_block_active(&self, kind: BlockKind) -> bool {
        self.selected_blocks()
            .is_some_and(|range| self.document.blocks()[range].iter().any(|b| b.kind == kind))
    }

    /// Set every selected block to `kind`, or back to a paragraph if already of that kind
    pub fn toggle_block(&mut self, kind: BlockKind) -> bool {
        let Some(range) = self.selected_blocks() else {
            return false;
        };
        let target = if self.is_block_active(kind) {
            BlockKind::Paragraph
        } else {
            kind
        };

        let mut changed = false;
        for block in &mut self.document.blocks_mut()[range] {
            if block.kind != target {
                block.kind = target;
                changed = true;
            }
        }
        if changed {
            debug!(block = target.as_str(), "retargeted blocks");
            self.commit();
        }
        changed
    }

    fn selected_blocks(&self) -> Option<std::ops::Range<usize>> {
        let selection = self.selection?;
        let (start, end) = self.document.ordered(selection.anchor, selection.focus);
        Some(start.block_index..end.block_index + 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, TagKind};
    use crate::clock::ManualClock;
    use crate::richtext::*;
    use std::rc::Rc;

    fn editor_with(blocks: Vec<Block>) -> (AnnotatedEditor, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new(100));
        let editor = AnnotatedEditor::with_clock(AnnotatedDocument::from_blocks(blocks), clock.clone());
        (editor, clock)
    }

    fn fallacy(id: &str) -> &'static crate::catalog::Tag {
        Catalog::builtin().find(TagKind::Fallacy, id).unwrap()
    }

    fn rhetoric(id: &str) -> &'static crate::catalog::Tag {
        Catalog::builtin().find(TagKind::Rhetoric, id).unwrap()
    }

    #[test]
    fn test_apply_tag_returns_absolute_range() {
        let text = "They want to destroy the entire oil industry overnight.";
        let (mut editor, _) = editor_with(vec![
            Block::new(BlockKind::HeadingOne).with_plain_text("Debate"),
            Block::paragraph().with_plain_text(text),
        ]);
        editor.set_selection(DocumentPosition::new(1, 13), DocumentPosition::new(1, 44));
        assert_eq!(editor.selected_text(), "destroy the entire oil industry");

        let range = editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        assert_eq!(range, AppliedRange { start: 20, end: 51 });

        let runs = &editor.document().blocks()[1].children;
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].text, "destroy the entire oil industry");
        assert_eq!(runs[1].fallacy_marks.len(), 1);
        let mark = &runs[1].fallacy_marks[0];
        assert_eq!(mark.fallacy_id, "straw-man");
        assert_eq!(mark.color, "#FF6B6B");
        assert_eq!(mark.applied_at, 100);
        assert!(mark.id.starts_with("mark_100_"));
        assert!(runs[0].fallacy_marks.is_empty());
        assert!(runs[2].fallacy_marks.is_empty());
    }

    #[test]
    fn test_apply_requires_expanded_selection() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("text")]);
        assert!(editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).is_none());
        editor.set_cursor(DocumentPosition::new(0, 2));
        assert!(editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).is_none());
        assert!(!editor.document().blocks()[0].children[0].has_marks());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let (mut editor, clock) = editor_with(vec![Block::paragraph().with_plain_text("some claim")]);
        editor.select_all();
        assert!(editor.apply_tag(TagKind::Fallacy, fallacy("ad-hominem")).is_some());
        clock.advance(10);
        assert!(editor.apply_tag(TagKind::Fallacy, fallacy("ad-hominem")).is_none());

        let run = &editor.document().blocks()[0].children[0];
        assert_eq!(run.fallacy_marks.len(), 1);
    }

    #[test]
    fn test_partially_tagged_selection_blocks_reapply() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("alpha beta gamma")]);
        editor.select_offsets(0, 5);
        editor.apply_tag(TagKind::Fallacy, fallacy("ad-hominem")).unwrap();

        editor.select_offsets(0, 16);
        assert!(editor.apply_tag(TagKind::Fallacy, fallacy("ad-hominem")).is_none());
        assert_eq!(editor.document().count_by_tag(TagKind::Fallacy)["ad-hominem"], 1);
    }

    #[test]
    fn test_kinds_are_independent() {
        let (mut editor, clock) = editor_with(vec![Block::paragraph().with_plain_text("act now")]);
        editor.select_all();
        editor.apply_tag(TagKind::Fallacy, fallacy("false-dilemma")).unwrap();
        clock.advance(5);
        editor.apply_tag(TagKind::Rhetoric, rhetoric("urgency")).unwrap();

        let run = &editor.document().blocks()[0].children[0];
        assert_eq!(run.fallacy_marks.len(), 1);
        assert_eq!(run.rhetoric_marks.len(), 1);
        assert_ne!(run.fallacy_marks[0].id, run.rhetoric_marks[0].id);

        // Mismatched taxonomy is refused
        assert!(editor.apply_tag(TagKind::Fallacy, rhetoric("appeal-to-fear")).is_none());
    }

    #[test]
    fn test_overlapping_apply_splits_runs() {
        let (mut editor, clock) = editor_with(vec![Block::paragraph().with_plain_text("0123456789")]);
        editor.select_offsets(0, 6);
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        clock.advance(1);
        editor.select_offsets(4, 10);
        editor.apply_tag(TagKind::Fallacy, fallacy("red-herring")).unwrap();

        let runs = &editor.document().blocks()[0].children;
        let shape: Vec<(&str, usize)> = runs.iter().map(|r| (r.text.as_str(), r.fallacy_marks.len())).collect();
        assert_eq!(shape, vec![("0123", 1), ("45", 2), ("6789", 1)]);
        assert_eq!(runs[1].fallacy_marks[0].id, runs[0].fallacy_marks[0].id);
        assert_eq!(runs[1].fallacy_marks[1].id, runs[2].fallacy_marks[0].id);
    }

    #[test]
    fn test_remove_round_trip() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("claim text")]);
        editor.select_offsets(0, 5);
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        let before = editor.document().clone();

        editor.select_offsets(0, 10);
        editor.apply_tag(TagKind::Fallacy, fallacy("red-herring"));
        assert!(editor.remove_tag(TagKind::Fallacy, "red-herring"));
        assert_eq!(editor.document(), &before);

        assert!(!editor.remove_tag(TagKind::Fallacy, "red-herring"));
    }

    #[test]
    fn test_remove_is_scoped_to_selection() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("0123456789")]);
        editor.select_all();
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        editor.select_offsets(3, 6);
        assert!(editor.remove_tag(TagKind::Fallacy, "straw-man"));

        let runs = &editor.document().blocks()[0].children;
        let shape: Vec<(&str, bool)> = runs.iter().map(|r| (r.text.as_str(), r.has_marks())).collect();
        assert_eq!(shape, vec![("012", true), ("345", false), ("6789", true)]);
    }

    #[test]
    fn test_clear_all_annotations() {
        let (mut editor, _) = editor_with(vec![
            Block::paragraph().with_plain_text("first"),
            Block::paragraph().with_plain_text("second"),
        ]);
        editor.select_all();
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        editor.apply_tag(TagKind::Rhetoric, rhetoric("urgency")).unwrap();
        assert_eq!(editor.document().total_mark_count(), 4);

        editor.select_all();
        assert!(editor.clear_all_annotations());
        assert_eq!(editor.document().total_mark_count(), 0);
        assert!(!editor.clear_all_annotations());
    }

    #[test]
    fn test_apply_can_be_undone() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("claim")]);
        editor.select_all();
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        assert!(editor.undo());
        assert_eq!(editor.document().total_mark_count(), 0);
        assert!(editor.redo());
        assert_eq!(editor.document().total_mark_count(), 1);
    }

    #[test]
    fn test_toggle_style_mark_on_range() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("Hello world")]);
        editor.select_offsets(0, 5);
        assert!(editor.toggle_style_mark(StyleMark::Bold));
        assert!(editor.document().blocks()[0].children[0].style.bold);
        assert!(editor.is_style_active(StyleMark::Bold));

        editor.select_offsets(0, 5);
        assert!(editor.toggle_style_mark(StyleMark::Bold));
        assert_eq!(editor.document().blocks()[0].children.len(), 1);
    }

    #[test]
    fn test_toggle_style_keeps_annotations() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("Hello world")]);
        editor.select_all();
        editor.apply_tag(TagKind::Fallacy, fallacy("straw-man")).unwrap();
        editor.select_offsets(6, 11);
        editor.toggle_style_mark(StyleMark::Italic);

        let runs = &editor.document().blocks()[0].children;
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.fallacy_marks.len() == 1));
        assert!(runs[1].style.italic);
    }

    #[test]
    fn test_toggle_style_collapsed_applies_to_next_insert() {
        let (mut editor, _) = editor_with(vec![Block::paragraph().with_plain_text("Hello")]);
        editor.set_cursor(DocumentPosition::new(0, 5));
        assert!(editor.toggle_style_mark(StyleMark::Underline));
        assert!(editor.is_style_active(StyleMark::Underline));
        editor.insert_text("!").unwrap();

        let runs = &editor.document().blocks()[0].children;
        assert_eq!(runs.len(), 2);
        assert!(runs[1].style.underline);
        assert!(editor.pending_style().is_none());
    }

    #[test]
    fn test_toggle_block() {
        let (mut editor, _) = editor_with(vec![
            Block::paragraph().with_plain_text("one"),
            Block::new(BlockKind::HeadingOne).with_plain_text("two"),
            Block::paragraph().with_plain_text("three"),
        ]);
        editor.set_cursor(DocumentPosition::new(0, 1));
        assert!(editor.toggle_block(BlockKind::BlockQuote));
        assert_eq!(editor.document().blocks()[0].kind, BlockKind::BlockQuote);

        // Any block already a heading turns the whole selection back into paragraphs
        editor.set_selection(DocumentPosition::new(0, 0), DocumentPosition::new(2, 2));
        assert!(editor.toggle_block(BlockKind::HeadingOne));
        let kinds: Vec<BlockKind> = editor.document().blocks().iter().map(|b| b.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Paragraph; 3]);

        assert!(editor.toggle_block(BlockKind::HeadingTwo));
        assert!(editor.document().blocks().iter().all(|b| b.kind == BlockKind::HeadingTwo));
    }
}
