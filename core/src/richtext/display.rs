// Display resolution
// Picks one highlight color per run and describes the overflow badge.

use super::annotated_document::TextRun;
use super::marks::MarkView;
use crate::catalog::{Catalog, TagKind};

/// One line of the badge popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeEntry {
    pub kind: TagKind,
    pub tag_id: String,
    /// Catalog name, or the raw id for tags the catalog no longer knows
    pub name: String,
    pub color: String,
}

/// How a run should be rendered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDisplay {
    /// Background color; `None` means no highlight
    pub color: Option<String>,
    /// Number of marks beyond the displayed one, when there are several
    pub badge: Option<usize>,
    /// Every mark, fallacies first, each group in application order
    pub entries: Vec<BadgeEntry>,
}

impl RunDisplay {
    pub fn is_highlighted(&self) -> bool {
        self.color.is_some()
    }

    /// Badge text such as "+2"
    pub fn badge_label(&self) -> Option<String> {
        self.badge.map(|n| format!("+{}", n))
    }
}

/// The mark whose color is displayed: the latest `applied_at` across both lists.
/// Scanning fallacies before rhetoric with `>=` lets rhetoric win equal timestamps.
pub fn latest_mark(run: &TextRun) -> Option<MarkView<'_>> {
    let mut latest: Option<MarkView<'_>> = None;
    for mark in run.marks() {
        match latest {
            Some(current) if mark.applied_at < current.applied_at => {}
            _ => latest = Some(mark),
        }
    }
    latest
}

pub fn resolve_color(run: &TextRun) -> Option<&str> {
    latest_mark(run).map(|m| m.color)
}

/// Resolve highlight color, badge and popup entries for a run
pub fn resolve_display(run: &TextRun, catalog: &Catalog) -> RunDisplay {
    let Some(latest) = latest_mark(run) else {
        return RunDisplay::default();
    };

    let count = run.mark_count();
    let entries = run
        .marks()
        .map(|mark| BadgeEntry {
            kind: mark.kind,
            tag_id: mark.tag_id.to_string(),
            name: catalog
                .name_of(mark.kind, mark.tag_id)
                .unwrap_or(mark.tag_id)
                .to_string(),
            color: mark.color.to_string(),
        })
        .collect();

    RunDisplay {
        color: Some(latest.color.to_string()),
        badge: (count > 1).then(|| count - 1),
        entries,
    }
}
