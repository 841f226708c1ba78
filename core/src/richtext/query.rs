// Read-side queries and annotation navigation.
// Queries never fail: stale points are clamped, empty documents give empty results.

use super::annotated_document::*;
use super::editor::{AnnotatedEditor, Selection};
use super::marks::{ActiveMarks, FallacyMark, MarkView};
use crate::catalog::TagKind;
use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One fallacy-marked run, summarised by its primary (most recent) fallacy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedSpan {
    pub tag_id: String,
    pub color: String,
    pub text: String,
}

/// One logical annotation: every run carrying the same mark id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationRecord {
    pub id: String,
    pub kind: TagKind,
    pub tag_id: String,
    pub color: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub applied_at: Timestamp,
}

/// Distinct tag ids in first-use order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedTags {
    pub fallacies: Vec<String>,
    pub rhetoric: Vec<String>,
}

/// Which runs count as annotations for navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationFilter {
    /// Restrict to one taxonomy; `None` accepts both
    pub kind: Option<TagKind>,
    /// Restrict to one tag id
    pub tag_id: Option<String>,
}

impl AnnotationFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn fallacies(tag_id: Option<&str>) -> Self {
        AnnotationFilter {
            kind: Some(TagKind::Fallacy),
            tag_id: tag_id.map(str::to_string),
        }
    }

    pub fn rhetoric(tag_id: Option<&str>) -> Self {
        AnnotationFilter {
            kind: Some(TagKind::Rhetoric),
            tag_id: tag_id.map(str::to_string),
        }
    }

    fn accepts(&self, mark: &MarkView<'_>) -> bool {
        self.kind.is_none_or(|kind| kind == mark.kind)
            && self.tag_id.as_deref().is_none_or(|id| id == mark.tag_id)
    }

    pub fn matches(&self, run: &TextRun) -> bool {
        !run.is_empty() && run.marks().any(|m| self.accepts(&m))
    }
}

impl AnnotatedDocument {
    /// Mark lists of the run at `pos`; empty when the document has no runs there
    pub fn marks_at(&self, pos: DocumentPosition) -> ActiveMarks {
        self.run_at(pos)
            .map(|(_, run)| run.active_marks())
            .unwrap_or_default()
    }

    /// Mark instances per tag id. A tag spanning N runs counts N.
    pub fn count_by_tag(&self, kind: TagKind) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for run in self.runs() {
            for mark in run.marks_of(kind) {
                *counts.entry(mark.tag_id.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// One entry per run carrying a fallacy mark, in document order
    pub fn enumerate_annotations(&self) -> Vec<AnnotatedSpan> {
        self.runs()
            .filter_map(|run| {
                run.primary_fallacy().map(|mark| AnnotatedSpan {
                    tag_id: mark.fallacy_id.clone(),
                    color: mark.color.clone(),
                    text: run.text.clone(),
                })
            })
            .collect()
    }

    pub fn used_tags(&self) -> UsedTags {
        let mut used = UsedTags::default();
        for run in self.runs() {
            for mark in run.marks() {
                let list = match mark.kind {
                    TagKind::Fallacy => &mut used.fallacies,
                    TagKind::Rhetoric => &mut used.rhetoric,
                };
                if !list.iter().any(|id| id == mark.tag_id) {
                    list.push(mark.tag_id.to_string());
                }
            }
        }
        used
    }

    pub fn total_mark_count(&self) -> usize {
        self.runs().map(|run| run.mark_count()).sum()
    }

    /// Logical annotations derived from the embedded marks, ordered by first occurrence
    pub fn annotation_index(&self) -> Vec<AnnotationRecord> {
        let mut records: Vec<AnnotationRecord> = Vec::new();
        for location in self.run_locations() {
            let Some(run) = self.run(&location) else {
                continue;
            };
            if run.is_empty() {
                continue;
            }
            let start = self.absolute_offset(location.start);
            let end = self.absolute_offset(location.end);
            for mark in run.marks() {
                match records.iter_mut().find(|r| r.id == mark.id) {
                    Some(record) => {
                        record.text.push_str(&run.text);
                        record.end = end;
                    }
                    None => records.push(AnnotationRecord {
                        id: mark.id.to_string(),
                        kind: mark.kind,
                        tag_id: mark.tag_id.to_string(),
                        color: mark.color.to_string(),
                        text: run.text.clone(),
                        start,
                        end,
                        applied_at: mark.applied_at,
                    }),
                }
            }
        }
        records
    }

    fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.blocks().iter().flat_map(|b| b.children.iter())
    }

    fn qualifying_runs(&self, filter: &AnnotationFilter) -> Vec<RunLocation> {
        self.run_locations()
            .into_iter()
            .filter(|loc| self.run(loc).is_some_and(|run| filter.matches(run)))
            .collect()
    }
}

impl AnnotatedEditor {
    /// Mark lists at the selection anchor; empty without a selection
    pub fn marks_at_cursor(&self) -> ActiveMarks {
        match self.selection {
            Some(selection) => self.document.marks_at(selection.anchor),
            None => ActiveMarks::default(),
        }
    }

    /// The primary fallacy under the selection anchor
    pub fn annotation_at_selection(&self) -> Option<FallacyMark> {
        let selection = self.selection?;
        let (_, run) = self.document.run_at(selection.anchor)?;
        run.primary_fallacy().cloned()
    }

    /// Select the next fallacy-marked run, optionally only runs carrying `tag_id`
    pub fn select_next(&mut self, tag_id: Option<&str>) -> bool {
        self.select_next_matching(&AnnotationFilter::fallacies(tag_id))
    }

    /// Select the previous fallacy-marked run, optionally only runs carrying `tag_id`
    pub fn select_previous(&mut self, tag_id: Option<&str>) -> bool {
        self.select_previous_matching(&AnnotationFilter::fallacies(tag_id))
    }

    /// Move the selection to the next run accepted by `filter`, wrapping at the end.
    /// Returns false and leaves the selection alone when no run qualifies.
    pub fn select_next_matching(&mut self, filter: &AnnotationFilter) -> bool {
        let current = self.anchor_run();
        let mut found_current = current.is_none();
        let mut target = None;

        for location in self.document.run_locations() {
            if !found_current {
                if Some(location) == current {
                    found_current = true;
                }
                continue;
            }
            if self.document.run(&location).is_some_and(|run| filter.matches(run)) {
                target = Some(location);
                break;
            }
        }

        let target = target.or_else(|| self.document.qualifying_runs(filter).first().copied());
        self.select_run(target)
    }

    /// Move the selection to the previous run accepted by `filter`, wrapping at the start.
    /// When the selection is not on a qualifying run, the last qualifying run is chosen.
    pub fn select_previous_matching(&mut self, filter: &AnnotationFilter) -> bool {
        let qualifying = self.document.qualifying_runs(filter);
        if qualifying.is_empty() {
            return false;
        }

        let anchor = self.selection.map(|selection| selection.anchor);
        let current = anchor.and_then(|pos| qualifying.iter().position(|loc| loc.contains(pos)));
        let index = match current {
            Some(0) => qualifying.len() - 1,
            Some(i) => i - 1,
            None => qualifying.len() - 1,
        };
        self.select_run(Some(qualifying[index]))
    }

    fn anchor_run(&self) -> Option<RunLocation> {
        let selection = self.selection?;
        self.document.run_at(selection.anchor).map(|(loc, _)| loc)
    }

    fn select_run(&mut self, target: Option<RunLocation>) -> bool {
        let Some(location) = target else {
            return false;
        };
        debug!(
            block = location.block_index,
            run = location.run_index,
            "selecting annotated run"
        );
        self.selection = Some(Selection::new(location.start, location.end));
        self.pending_style = None;
        true
    }
}
