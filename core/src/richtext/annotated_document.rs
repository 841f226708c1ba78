// Annotated Document Model
// Blocks of text runs; each run carries style flags and ordered annotation mark lists.
// Offsets are counted in characters (Unicode scalar values), never bytes.

use super::marks::{
    contains_tag, ActiveMarks, AnnotationMark, FallacyMark, MarkView, RhetoricMark,
};
use crate::catalog::TagKind;
use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};
use std::cmp::min;
use std::fmt;
use std::ops::Range;

/// Byte index of the given character offset (clamped to the end of the string)
fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Text styling flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
}

impl TextStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        TextStyle {
            bold: true,
            ..Default::default()
        }
    }

    pub fn italic() -> Self {
        TextStyle {
            italic: true,
            ..Default::default()
        }
    }

    pub fn get(&self, mark: StyleMark) -> bool {
        match mark {
            StyleMark::Bold => self.bold,
            StyleMark::Italic => self.italic,
            StyleMark::Underline => self.underline,
            StyleMark::Strikethrough => self.strikethrough,
        }
    }

    pub fn set(&mut self, mark: StyleMark, value: bool) {
        match mark {
            StyleMark::Bold => self.bold = value,
            StyleMark::Italic => self.italic = value,
            StyleMark::Underline => self.underline = value,
            StyleMark::Strikethrough => self.strikethrough = value,
        }
    }
}

/// Boolean style marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleMark {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

/// A run of text with uniform style and annotation marks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    #[serde(flatten)]
    pub style: TextStyle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallacy_marks: Vec<FallacyMark>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rhetoric_marks: Vec<RhetoricMark>,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        TextRun {
            text: text.into(),
            style,
            fallacy_marks: Vec::new(),
            rhetoric_marks: Vec::new(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TextStyle::plain())
    }

    pub fn with_fallacy_mark(mut self, mark: FallacyMark) -> Self {
        self.fallacy_marks.push(mark);
        self
    }

    pub fn with_rhetoric_mark(mut self, mark: RhetoricMark) -> Self {
        self.rhetoric_marks.push(mark);
        self
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Split this run at the given character offset.
    /// Both halves keep the full style and mark lists.
    pub fn split_at(&self, offset: usize) -> (TextRun, TextRun) {
        let (left, right) = self.text.split_at(byte_index(&self.text, offset));
        let mut left_run = self.clone();
        left_run.text = left.to_string();
        let mut right_run = self.clone();
        right_run.text = right.to_string();
        (left_run, right_run)
    }

    /// Insert text at the given character offset
    pub fn insert_text(&mut self, offset: usize, text: &str) {
        let at = byte_index(&self.text, offset);
        self.text.insert_str(at, text);
    }

    /// Delete characters in [start..end)
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let a = byte_index(&self.text, start);
        let b = byte_index(&self.text, end);
        if a < b {
            self.text.drain(a..b);
        }
    }

    /// Same style and identical mark lists; such neighbours coalesce
    pub fn same_formatting(&self, other: &TextRun) -> bool {
        self.style == other.style
            && self.fallacy_marks == other.fallacy_marks
            && self.rhetoric_marks == other.rhetoric_marks
    }

    pub fn has_tag(&self, kind: TagKind, tag_id: &str) -> bool {
        match kind {
            TagKind::Fallacy => contains_tag(&self.fallacy_marks, tag_id),
            TagKind::Rhetoric => contains_tag(&self.rhetoric_marks, tag_id),
        }
    }

    pub fn has_marks_of(&self, kind: TagKind) -> bool {
        match kind {
            TagKind::Fallacy => !self.fallacy_marks.is_empty(),
            TagKind::Rhetoric => !self.rhetoric_marks.is_empty(),
        }
    }

    pub fn has_marks(&self) -> bool {
        self.mark_count() > 0
    }

    pub fn mark_count(&self) -> usize {
        self.fallacy_marks.len() + self.rhetoric_marks.len()
    }

    /// Append a mark unless the run already carries the tag. Returns whether it was added.
    pub fn add_mark(
        &mut self,
        kind: TagKind,
        id: &str,
        tag_id: &str,
        color: &str,
        applied_at: Timestamp,
    ) -> bool {
        fn push<M: AnnotationMark>(
            marks: &mut Vec<M>,
            id: &str,
            tag_id: &str,
            color: &str,
            applied_at: Timestamp,
        ) -> bool {
            if contains_tag(marks, tag_id) {
                return false;
            }
            marks.push(M::create(
                id.to_string(),
                tag_id.to_string(),
                color.to_string(),
                applied_at,
            ));
            true
        }

        match kind {
            TagKind::Fallacy => push(&mut self.fallacy_marks, id, tag_id, color, applied_at),
            TagKind::Rhetoric => push(&mut self.rhetoric_marks, id, tag_id, color, applied_at),
        }
    }

    /// Remove every mark of `kind` referencing `tag_id`. Returns how many were removed.
    pub fn remove_tag(&mut self, kind: TagKind, tag_id: &str) -> usize {
        fn retain<M: AnnotationMark>(marks: &mut Vec<M>, tag_id: &str) -> usize {
            let before = marks.len();
            marks.retain(|m| m.tag_id() != tag_id);
            before - marks.len()
        }

        match kind {
            TagKind::Fallacy => retain(&mut self.fallacy_marks, tag_id),
            TagKind::Rhetoric => retain(&mut self.rhetoric_marks, tag_id),
        }
    }

    /// Remove all annotation marks. Returns how many were removed.
    pub fn clear_marks(&mut self) -> usize {
        let removed = self.mark_count();
        self.fallacy_marks.clear();
        self.rhetoric_marks.clear();
        removed
    }

    /// All marks, fallacies first, each list in application order
    pub fn marks(&self) -> impl Iterator<Item = MarkView<'_>> {
        self.fallacy_marks
            .iter()
            .map(|m| m.view())
            .chain(self.rhetoric_marks.iter().map(|m| m.view()))
    }

    pub fn marks_of(&self, kind: TagKind) -> Vec<MarkView<'_>> {
        match kind {
            TagKind::Fallacy => self.fallacy_marks.iter().map(|m| m.view()).collect(),
            TagKind::Rhetoric => self.rhetoric_marks.iter().map(|m| m.view()).collect(),
        }
    }

    /// The most recently applied fallacy mark
    pub fn primary_fallacy(&self) -> Option<&FallacyMark> {
        self.fallacy_marks.last()
    }

    pub fn active_marks(&self) -> ActiveMarks {
        ActiveMarks {
            fallacy_marks: self.fallacy_marks.clone(),
            rhetoric_marks: self.rhetoric_marks.clone(),
        }
    }
}

/// Block-level element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    HeadingOne,
    HeadingTwo,
    BlockQuote,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "paragraph",
            BlockKind::HeadingOne => "heading-one",
            BlockKind::HeadingTwo => "heading-two",
            BlockKind::BlockQuote => "block-quote",
        }
    }
}

/// A block of runs. Never has zero children once normalized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub children: Vec<TextRun>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Block {
            kind,
            children: vec![TextRun::plain("")],
        }
    }

    pub fn paragraph() -> Self {
        Self::new(BlockKind::Paragraph)
    }

    /// Append a run, replacing the placeholder empty run of a fresh block
    pub fn with_run(mut self, run: TextRun) -> Self {
        if self.children.len() == 1 && self.children[0].is_empty() {
            self.children.clear();
        }
        self.children.push(run);
        self
    }

    pub fn with_text(self, text: impl Into<String>, style: TextStyle) -> Self {
        self.with_run(TextRun::new(text, style))
    }

    pub fn with_plain_text(self, text: impl Into<String>) -> Self {
        self.with_run(TextRun::plain(text))
    }

    /// Total length in characters
    pub fn text_len(&self) -> usize {
        self.children.iter().map(|r| r.len()).sum()
    }

    pub fn to_plain_text(&self) -> String {
        self.children.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(|r| r.is_empty())
    }

    /// Character span [start, end) of every run
    pub fn run_spans(&self) -> Vec<(usize, usize)> {
        let mut pos = 0;
        self.children
            .iter()
            .map(|r| {
                let start = pos;
                pos += r.len();
                (start, pos)
            })
            .collect()
    }

    /// Index of the run holding the character after `offset`
    /// (the last run when `offset` is at the end of the block)
    pub fn run_index_at(&self, offset: usize) -> usize {
        let mut pos = 0;
        let mut found = 0;
        for (i, run) in self.children.iter().enumerate() {
            if pos > offset {
                break;
            }
            found = i;
            pos += run.len();
        }
        found
    }

    /// Make sure a run boundary exists at `offset`.
    /// Returns the index of the first run starting at or after it.
    pub fn split_runs_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.children.len() {
            let len = self.children[i].len();
            if offset == pos {
                return i;
            }
            if offset < pos + len {
                let (left, right) = self.children[i].split_at(offset - pos);
                self.children[i] = left;
                self.children.insert(i + 1, right);
                return i + 1;
            }
            pos += len;
        }
        self.children.len()
    }

    /// Split runs so that [start, end) is covered by whole runs; returns their index range
    pub fn split_range(&mut self, start: usize, end: usize) -> Range<usize> {
        let len = self.text_len();
        let start = min(start, len);
        let end = min(end, len).max(start);
        let first = self.split_runs_at(start);
        let last = self.split_runs_at(end);
        first..last
    }

    /// Delete text in [start..end)
    pub fn delete_text_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let range = self.split_range(start, end);
        self.children.drain(range);
        self.normalize();
    }

    /// Split this block's runs at `offset`, returning the right part.
    /// The left part remains in self.
    pub fn split_content_at(&mut self, offset: usize) -> Vec<TextRun> {
        let offset = min(offset, self.text_len());
        let index = self.split_runs_at(offset);
        let mut right = self.children.split_off(index);
        if right.is_empty() {
            // Keep the formatting of the run the split happened at
            let mut carry = self.children.last().cloned().unwrap_or_else(|| TextRun::plain(""));
            carry.text.clear();
            right.push(carry);
        }
        self.normalize();
        right
    }

    /// Insert text at `offset`. The run ending at `offset` is extended so the new
    /// characters inherit its marks; `style` overrides the style of the inserted text.
    pub fn insert_text(&mut self, offset: usize, text: &str, style: Option<TextStyle>) {
        if text.is_empty() {
            return;
        }
        let offset = min(offset, self.text_len());
        let spans = self.run_spans();
        let index = if offset == 0 {
            0
        } else {
            spans
                .iter()
                .position(|(start, end)| *start < offset && offset <= *end)
                .unwrap_or(self.children.len().saturating_sub(1))
        };
        let local = offset - spans.get(index).map(|(s, _)| *s).unwrap_or(0);

        match style {
            Some(style) if style != self.children[index].style => {
                let mut inserted = self.children[index].clone();
                inserted.text = text.to_string();
                inserted.style = style;
                let at = self.split_runs_at(offset);
                self.children.insert(at, inserted);
            }
            _ => self.children[index].insert_text(local, text),
        }
        self.normalize();
    }

    /// Drop empty runs, merge neighbours with identical formatting, keep one run minimum
    pub fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.children.len());
        let mut placeholder: Option<TextRun> = None;

        for run in self.children.drain(..) {
            if run.is_empty() {
                placeholder.get_or_insert(run);
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.same_formatting(&run) => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }

        if merged.is_empty() {
            let mut run = placeholder.unwrap_or_else(|| TextRun::plain(""));
            run.clear_marks();
            merged.push(run);
        }
        self.children = merged;
    }
}

/// Position within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentPosition {
    pub block_index: usize,
    pub offset: usize, // Character offset within the block's text
}

impl DocumentPosition {
    pub fn new(block_index: usize, offset: usize) -> Self {
        DocumentPosition {
            block_index,
            offset,
        }
    }

    pub fn start() -> Self {
        DocumentPosition::new(0, 0)
    }
}

/// Location of one run inside the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLocation {
    pub block_index: usize,
    pub run_index: usize,
    pub start: DocumentPosition,
    pub end: DocumentPosition,
}

impl RunLocation {
    /// Whether `pos` falls inside this run, edges included
    pub fn contains(&self, pos: DocumentPosition) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// Absolute character range, counting one separator between blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRange {
    pub start: usize,
    pub end: usize,
}

/// The annotated document: an ordered, never-empty sequence of blocks
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedDocument {
    blocks: Vec<Block>,
}

impl AnnotatedDocument {
    /// The canonical empty document: one paragraph holding one empty run
    pub fn new() -> Self {
        AnnotatedDocument {
            blocks: vec![Block::paragraph()],
        }
    }

    /// Build from blocks, normalizing each. An empty list yields the canonical empty document.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            return Self::new();
        }
        let mut doc = AnnotatedDocument { blocks };
        doc.normalize();
        doc
    }

    pub fn with_paragraph(text: impl Into<String>) -> Self {
        Self::from_blocks(vec![Block::paragraph().with_plain_text(text)])
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether this is the canonical empty document
    pub fn is_blank(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].is_empty()
    }

    /// Validate and clamp a position to document bounds
    pub fn clamp_position(&self, pos: DocumentPosition) -> DocumentPosition {
        if self.blocks.is_empty() {
            return DocumentPosition::start();
        }
        if pos.block_index >= self.blocks.len() {
            return self.end_position();
        }
        let block = &self.blocks[pos.block_index];
        DocumentPosition::new(pos.block_index, pos.offset.min(block.text_len()))
    }

    pub fn end_position(&self) -> DocumentPosition {
        match self.blocks.last() {
            Some(last) => DocumentPosition::new(self.blocks.len() - 1, last.text_len()),
            None => DocumentPosition::start(),
        }
    }

    /// Total characters including one separator between blocks
    pub fn text_len(&self) -> usize {
        let chars: usize = self.blocks.iter().map(|b| b.text_len()).sum();
        chars + self.blocks.len().saturating_sub(1)
    }

    /// Absolute character offset of a position
    pub fn absolute_offset(&self, pos: DocumentPosition) -> usize {
        let pos = self.clamp_position(pos);
        let before: usize = self.blocks[..pos.block_index]
            .iter()
            .map(|b| b.text_len() + 1)
            .sum();
        before + pos.offset
    }

    /// Position of an absolute character offset (clamped to the document end).
    /// An offset on a block separator maps to the end of the earlier block.
    pub fn position_at(&self, absolute: usize) -> DocumentPosition {
        let mut remaining = absolute;
        for (i, block) in self.blocks.iter().enumerate() {
            let len = block.text_len();
            if remaining <= len {
                return DocumentPosition::new(i, remaining);
            }
            remaining -= len + 1;
        }
        self.end_position()
    }

    /// Every run in document order, with its position range
    pub fn run_locations(&self) -> Vec<RunLocation> {
        let mut locations = Vec::new();
        for (block_index, block) in self.blocks.iter().enumerate() {
            for (run_index, (start, end)) in block.run_spans().into_iter().enumerate() {
                locations.push(RunLocation {
                    block_index,
                    run_index,
                    start: DocumentPosition::new(block_index, start),
                    end: DocumentPosition::new(block_index, end),
                });
            }
        }
        locations
    }

    pub fn run(&self, location: &RunLocation) -> Option<&TextRun> {
        self.blocks
            .get(location.block_index)
            .and_then(|b| b.children.get(location.run_index))
    }

    /// The run holding the character after `pos`. Stale positions are clamped first.
    pub fn run_at(&self, pos: DocumentPosition) -> Option<(RunLocation, &TextRun)> {
        let pos = self.clamp_position(pos);
        let block = self.blocks.get(pos.block_index)?;
        let run_index = block.run_index_at(pos.offset);
        let run = block.children.get(run_index)?;
        let (start, end) = block.run_spans()[run_index];
        Some((
            RunLocation {
                block_index: pos.block_index,
                run_index,
                start: DocumentPosition::new(pos.block_index, start),
                end: DocumentPosition::new(pos.block_index, end),
            },
            run,
        ))
    }

    /// Non-empty runs overlapping [start, end), in document order
    pub fn runs_in_range(&self, start: DocumentPosition, end: DocumentPosition) -> Vec<&TextRun> {
        let (start, end) = self.ordered(start, end);
        let mut runs = Vec::new();
        for block_index in start.block_index..=end.block_index.min(self.blocks.len() - 1) {
            let block = &self.blocks[block_index];
            let (local_start, local_end) = Self::local_bounds(block, block_index, start, end);
            for (run, (s, e)) in block.children.iter().zip(block.run_spans()) {
                if !run.is_empty() && s < local_end && e > local_start {
                    runs.push(run);
                }
            }
        }
        runs
    }

    /// Split runs at the range edges and call `f` on every non-empty run inside.
    /// The document is normalized afterwards. Returns whether `f` reported a change.
    pub(crate) fn update_runs_in_range<F>(
        &mut self,
        start: DocumentPosition,
        end: DocumentPosition,
        mut f: F,
    ) -> bool
    where
        F: FnMut(&mut TextRun) -> bool,
    {
        let (start, end) = self.ordered(start, end);
        let mut changed = false;
        for block_index in start.block_index..=end.block_index.min(self.blocks.len() - 1) {
            let (local_start, local_end) =
                Self::local_bounds(&self.blocks[block_index], block_index, start, end);
            let block = &mut self.blocks[block_index];
            let range = block.split_range(local_start, local_end);
            for run in &mut block.children[range] {
                if !run.is_empty() && f(run) {
                    changed = true;
                }
            }
        }
        self.normalize();
        changed
    }

    fn local_bounds(
        block: &Block,
        block_index: usize,
        start: DocumentPosition,
        end: DocumentPosition,
    ) -> (usize, usize) {
        let local_start = if block_index == start.block_index {
            start.offset
        } else {
            0
        };
        let local_end = if block_index == end.block_index {
            end.offset
        } else {
            block.text_len()
        };
        (local_start, local_end)
    }

    /// Clamp both positions and order them
    pub fn ordered(
        &self,
        a: DocumentPosition,
        b: DocumentPosition,
    ) -> (DocumentPosition, DocumentPosition) {
        let a = self.clamp_position(a);
        let b = self.clamp_position(b);
        if b < a { (b, a) } else { (a, b) }
    }

    /// Plain text of [start, end), blocks separated by a newline
    pub fn text_in_range(&self, start: DocumentPosition, end: DocumentPosition) -> String {
        let (start, end) = self.ordered(start, end);
        let mut out = String::new();
        for block_index in start.block_index..=end.block_index {
            let text = self.blocks[block_index].to_plain_text();
            let (local_start, local_end) =
                Self::local_bounds(&self.blocks[block_index], block_index, start, end);
            let a = byte_index(&text, local_start);
            let b = byte_index(&text, local_end);
            if block_index > start.block_index {
                out.push('\n');
            }
            out.push_str(&text[a..b.max(a)]);
        }
        out
    }

    pub fn to_plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.to_plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Delete content in [start..end) across blocks.
    /// If the range spans multiple blocks, merges the tail of the end block into the start block
    /// and removes all fully-covered blocks in between.
    pub fn delete_range(&mut self, start: DocumentPosition, end: DocumentPosition) {
        let (a, b) = self.ordered(start, end);
        if a == b {
            return;
        }

        if a.block_index == b.block_index {
            self.blocks[a.block_index].delete_text_range(a.offset, b.offset);
            return;
        }

        let tail = self.blocks[b.block_index].split_content_at(b.offset);
        {
            let block = &mut self.blocks[a.block_index];
            let len = block.text_len();
            block.delete_text_range(a.offset, len);
            block.children.extend(tail);
            block.normalize();
        }
        self.blocks.drain(a.block_index + 1..=b.block_index);
    }

    /// Split the block at `pos`; the right part becomes a new block of the same kind
    pub fn split_block(&mut self, pos: DocumentPosition) -> DocumentPosition {
        let pos = self.clamp_position(pos);
        let kind = self.blocks[pos.block_index].kind;
        let right = self.blocks[pos.block_index].split_content_at(pos.offset);
        let mut block = Block {
            kind,
            children: right,
        };
        block.normalize();
        self.blocks.insert(pos.block_index + 1, block);
        DocumentPosition::new(pos.block_index + 1, 0)
    }

    /// Restore the structural invariants: at least one block, every block normalized
    pub fn normalize(&mut self) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph());
        }
        for block in &mut self.blocks {
            block.normalize();
        }
    }
}

impl Default for AnnotatedDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for AnnotatedDocument {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.blocks.serialize(serializer)
    }
}

impl fmt::Display for AnnotatedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AnnotatedDocument ({} blocks):", self.blocks.len())?;
        for (i, block) in self.blocks.iter().enumerate() {
            write!(f, "  [{}] {}:", i, block.kind.as_str())?;
            for run in &block.children {
                write!(f, " {:?}", run.text)?;
                let marks: Vec<&str> = run.marks().map(|m| m.tag_id).collect();
                if !marks.is_empty() {
                    write!(f, "{{{}}}", marks.join(","))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
