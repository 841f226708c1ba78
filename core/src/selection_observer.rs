// Selection observer
// Coalesces selection-change notifications into one recomputation per frame.

use crate::error::GeometryError;
use crate::richtext::{ActiveMarks, AnnotatedEditor, DocumentPosition};

/// Screen rectangle of a selection
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Measures where a selection sits on screen. Provided by the rendering layer.
pub trait SelectionGeometry {
    fn selection_rect(
        &self,
        editor: &AnnotatedEditor,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> Result<Rect, GeometryError>;
}

/// Monospace layout: every block starts a new line and wraps at `columns`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextGridGeometry {
    pub columns: usize,
    pub cell_width: f64,
    pub line_height: f64,
}

impl TextGridGeometry {
    pub fn new(columns: usize) -> Self {
        TextGridGeometry {
            columns: columns.max(1),
            cell_width: 1.0,
            line_height: 1.0,
        }
    }

    /// (row, column) of a position
    fn cell(&self, editor: &AnnotatedEditor, pos: DocumentPosition) -> Result<(usize, usize), GeometryError> {
        let blocks = editor.document().blocks();
        let block = blocks.get(pos.block_index).ok_or(GeometryError::StalePosition)?;
        if pos.offset > block.text_len() {
            return Err(GeometryError::StalePosition);
        }
        let rows_before: usize = blocks[..pos.block_index]
            .iter()
            .map(|b| b.text_len() / self.columns + 1)
            .sum();
        Ok((rows_before + pos.offset / self.columns, pos.offset % self.columns))
    }
}

impl SelectionGeometry for TextGridGeometry {
    fn selection_rect(
        &self,
        editor: &AnnotatedEditor,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> Result<Rect, GeometryError> {
        if self.columns == 0 {
            return Err(GeometryError::NotLaidOut);
        }
        // Unclamped so stale positions still fail
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let (start_row, start_col) = self.cell(editor, start)?;
        let (end_row, end_col) = self.cell(editor, end)?;
        let (left, right) = if start_row == end_row {
            (start_col, end_col)
        } else {
            (0, self.columns)
        };
        Ok(Rect {
            x: left as f64 * self.cell_width,
            y: start_row as f64 * self.line_height,
            width: right.saturating_sub(left) as f64 * self.cell_width,
            height: (end_row - start_row + 1) as f64 * self.line_height,
        })
    }
}

/// What other components need to know about the current selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub has_selection: bool,
    pub selected_text: String,
    pub rect: Option<Rect>,
    /// Marks under the selection anchor
    pub marks: ActiveMarks,
}

#[derive(Debug, Default)]
pub struct SelectionObserver {
    state: SelectionState,
    frame_requested: bool,
}

impl SelectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a selection change. Returns true when the caller should schedule a frame;
    /// false when one is already pending.
    pub fn on_selection_change(&mut self) -> bool {
        if self.frame_requested {
            return false;
        }
        self.frame_requested = true;
        true
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_requested
    }

    /// Recompute from the editor's latest state. Geometry failures degrade to "no selection".
    pub fn on_animation_frame(
        &mut self,
        editor: &AnnotatedEditor,
        geometry: &dyn SelectionGeometry,
    ) -> &SelectionState {
        self.frame_requested = false;
        self.state = Self::compute(editor, geometry);
        &self.state
    }

    fn compute(editor: &AnnotatedEditor, geometry: &dyn SelectionGeometry) -> SelectionState {
        let Some((start, end)) = editor.selected_range() else {
            return SelectionState {
                marks: editor.marks_at_cursor(),
                ..Default::default()
            };
        };

        match geometry.selection_rect(editor, start, end) {
            Ok(rect) => SelectionState {
                has_selection: true,
                selected_text: editor.selected_text(),
                rect: Some(rect),
                marks: editor.marks_at_cursor(),
            },
            Err(err) => {
                tracing::debug!(%err, "selection geometry unavailable");
                SelectionState::default()
            }
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Drop any pending frame and forget the last state
    pub fn detach(&mut self) {
        self.frame_requested = false;
        self.state = SelectionState::default();
    }
}
