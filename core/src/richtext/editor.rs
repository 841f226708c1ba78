// Annotated Editor
// Selection state, pending style and undo history around an AnnotatedDocument.
// Annotation mutations live in mutation.rs, read-side queries in query.rs.

use super::annotated_document::*;
use crate::clock::{Clock, SystemClock};
use crate::error::{EditError, EditResult};
use crate::history::History;
use std::rc::Rc;
use unicode_segmentation::UnicodeSegmentation;

/// A selection between an anchor (where it started) and a focus (where it ends).
/// Collapsed when both are equal, i.e. a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: DocumentPosition,
    pub focus: DocumentPosition,
}

impl Selection {
    pub fn new(anchor: DocumentPosition, focus: DocumentPosition) -> Self {
        Selection { anchor, focus }
    }

    pub fn collapsed(pos: DocumentPosition) -> Self {
        Selection::new(pos, pos)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// (start, end) in document order
    pub fn ordered(&self) -> (DocumentPosition, DocumentPosition) {
        if self.focus < self.anchor {
            (self.focus, self.anchor)
        } else {
            (self.anchor, self.focus)
        }
    }
}

/// One undo step: the document and the selection that went with it
#[derive(Debug, Clone)]
struct EditorState {
    document: AnnotatedDocument,
    selection: Option<Selection>,
}

/// The annotation editor
pub struct AnnotatedEditor {
    pub(super) document: AnnotatedDocument,
    pub(super) selection: Option<Selection>,
    pub(super) pending_style: Option<TextStyle>,
    pub(super) clock: Rc<dyn Clock>,
    history: History<EditorState>,
    revision: u64,
}

impl AnnotatedEditor {
    /// Create a new editor with the canonical empty document
    pub fn new() -> Self {
        Self::with_document(AnnotatedDocument::new())
    }

    pub fn with_document(document: AnnotatedDocument) -> Self {
        Self::with_clock(document, Rc::new(SystemClock))
    }

    /// Create an editor whose mark timestamps come from `clock`
    pub fn with_clock(document: AnnotatedDocument, clock: Rc<dyn Clock>) -> Self {
        let history = History::with_initial(EditorState {
            document: document.clone(),
            selection: None,
        });
        AnnotatedEditor {
            document,
            selection: None,
            pending_style: None,
            clock,
            history,
            revision: 0,
        }
    }

    pub fn document(&self) -> &AnnotatedDocument {
        &self.document
    }

    /// Replace the whole document. Clears selection and undo history.
    pub fn set_document(&mut self, document: AnnotatedDocument) {
        self.document = document;
        self.selection = None;
        self.pending_style = None;
        self.history.reset(EditorState {
            document: self.document.clone(),
            selection: None,
        });
        self.revision += 1;
    }

    /// Counter bumped on every content change, including undo and redo
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Focus of the selection, if there is one
    pub fn cursor(&self) -> Option<DocumentPosition> {
        self.selection.map(|s| s.focus)
    }

    /// Set selection range (clamped to valid positions)
    pub fn set_selection(&mut self, anchor: DocumentPosition, focus: DocumentPosition) {
        self.selection = Some(Selection::new(
            self.document.clamp_position(anchor),
            self.document.clamp_position(focus),
        ));
        self.pending_style = None;
    }

    /// Collapse the selection to a cursor at `pos`
    pub fn set_cursor(&mut self, pos: DocumentPosition) {
        self.set_selection(pos, pos);
    }

    /// Select by absolute character offsets
    pub fn select_offsets(&mut self, start: usize, end: usize) {
        let anchor = self.document.position_at(start);
        let focus = self.document.position_at(end);
        self.set_selection(anchor, focus);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.pending_style = None;
    }

    /// Select all content in the document
    pub fn select_all(&mut self) {
        let end = self.document.end_position();
        self.set_selection(DocumentPosition::start(), end);
    }

    /// Ordered, clamped bounds of a non-collapsed selection
    pub fn selected_range(&self) -> Option<(DocumentPosition, DocumentPosition)> {
        let selection = self.selection?;
        let (start, end) = self.document.ordered(selection.anchor, selection.focus);
        (start != end).then_some((start, end))
    }

    pub fn has_expanded_selection(&self) -> bool {
        self.selected_range().is_some()
    }

    /// Plain text of the selection; empty when collapsed or absent
    pub fn selected_text(&self) -> String {
        match self.selected_range() {
            Some((start, end)) => self.document.text_in_range(start, end),
            None => String::new(),
        }
    }

    /// Style that the next insertion will use, if toggled while collapsed
    pub fn pending_style(&self) -> Option<TextStyle> {
        self.pending_style
    }

    /// Insert text at the cursor, replacing any expanded selection
    pub fn insert_text(&mut self, text: &str) -> EditResult<()> {
        if self.selection.is_none() {
            return Err(EditError::NoSelection);
        }
        if self.has_expanded_selection() {
            self.remove_selected_content();
        }
        let Some(pos) = self.cursor() else {
            return Err(EditError::NoSelection);
        };
        let pos = self.document.clamp_position(pos);
        let style = self.pending_style.take();

        let mut offset = pos.offset;
        for (i, line) in text.split('\n').enumerate() {
            let mut at = DocumentPosition::new(pos.block_index + i, offset);
            if i > 0 {
                at = self.document.split_block(DocumentPosition::new(
                    pos.block_index + i - 1,
                    offset,
                ));
                offset = 0;
            }
            self.document.blocks_mut()[at.block_index].insert_text(at.offset, line, style);
            offset += line.chars().count();
        }

        let blocks_added = text.matches('\n').count();
        let end = DocumentPosition::new(pos.block_index + blocks_added, offset);
        self.selection = Some(Selection::collapsed(end));
        self.commit();
        Ok(())
    }

    /// Split the current block at the cursor
    pub fn insert_newline(&mut self) -> EditResult<()> {
        if self.selection.is_none() {
            return Err(EditError::NoSelection);
        }
        if self.has_expanded_selection() {
            self.remove_selected_content();
        }
        let Some(pos) = self.cursor() else {
            return Err(EditError::NoSelection);
        };
        let next = self.document.split_block(pos);
        self.selection = Some(Selection::collapsed(next));
        self.commit();
        Ok(())
    }

    /// Delete the character before the cursor, or the selection if expanded
    pub fn delete_backward(&mut self) -> EditResult<()> {
        let Some(selection) = self.selection else {
            return Err(EditError::NoSelection);
        };
        if self.has_expanded_selection() {
            return self.delete_selection();
        }

        let pos = self.document.clamp_position(selection.focus);
        let start = if pos.offset > 0 {
            DocumentPosition::new(pos.block_index, pos.offset - 1)
        } else if pos.block_index > 0 {
            // Merge with the previous block
            let prev = pos.block_index - 1;
            DocumentPosition::new(prev, self.document.blocks()[prev].text_len())
        } else {
            return Err(EditError::NothingToDelete);
        };

        self.document.delete_range(start, pos);
        self.selection = Some(Selection::collapsed(start));
        self.commit();
        Ok(())
    }

    /// Delete the current selection
    pub fn delete_selection(&mut self) -> EditResult<()> {
        if self.selection.is_none() {
            return Err(EditError::NoSelection);
        }
        if !self.remove_selected_content() {
            return Err(EditError::NothingToDelete);
        }
        self.commit();
        Ok(())
    }

    fn remove_selected_content(&mut self) -> bool {
        let Some((start, end)) = self.selected_range() else {
            return false;
        };
        self.document.delete_range(start, end);
        self.selection = Some(Selection::collapsed(start));
        true
    }

    /// Record the current document as a new undo step
    pub(super) fn commit(&mut self) {
        self.history.record(EditorState {
            document: self.document.clone(),
            selection: self.selection,
        });
        self.revision += 1;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(state);
        true
    }

    fn restore(&mut self, state: EditorState) {
        self.document = state.document;
        self.selection = state.selection;
        self.pending_style = None;
        self.revision += 1;
    }

    pub fn word_count(&self) -> usize {
        self.document.to_plain_text().unicode_words().count()
    }

    pub fn char_count(&self) -> usize {
        self.document
            .blocks()
            .iter()
            .map(|b| b.text_len())
            .sum()
    }
}

impl Default for AnnotatedEditor {
    fn default() -> Self {
        Self::new()
    }
}
