// Annotation marks
// Value snapshots of a tag at the moment it was applied to a run.

use crate::catalog::TagKind;
use crate::clock::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallacyMark {
    pub id: String,
    pub fallacy_id: String,
    pub color: String,
    pub applied_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RhetoricMark {
    pub id: String,
    pub rhetoric_id: String,
    pub color: String,
    pub applied_at: Timestamp,
}

/// Shared shape of the two mark records, so list operations are written once
pub trait AnnotationMark: Clone {
    const KIND: TagKind;

    fn create(id: String, tag_id: String, color: String, applied_at: Timestamp) -> Self;
    fn id(&self) -> &str;
    fn tag_id(&self) -> &str;
    fn color(&self) -> &str;
    fn applied_at(&self) -> Timestamp;

    fn view(&self) -> MarkView<'_> {
        MarkView {
            kind: Self::KIND,
            id: self.id(),
            tag_id: self.tag_id(),
            color: self.color(),
            applied_at: self.applied_at(),
        }
    }
}

impl AnnotationMark for FallacyMark {
    const KIND: TagKind = TagKind::Fallacy;

    fn create(id: String, tag_id: String, color: String, applied_at: Timestamp) -> Self {
        FallacyMark {
            id,
            fallacy_id: tag_id,
            color,
            applied_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn tag_id(&self) -> &str {
        &self.fallacy_id
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn applied_at(&self) -> Timestamp {
        self.applied_at
    }
}

impl AnnotationMark for RhetoricMark {
    const KIND: TagKind = TagKind::Rhetoric;

    fn create(id: String, tag_id: String, color: String, applied_at: Timestamp) -> Self {
        RhetoricMark {
            id,
            rhetoric_id: tag_id,
            color,
            applied_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn tag_id(&self) -> &str {
        &self.rhetoric_id
    }

    fn color(&self) -> &str {
        &self.color
    }

    fn applied_at(&self) -> Timestamp {
        self.applied_at
    }
}

/// Borrowed, kind-tagged view of either mark record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkView<'a> {
    pub kind: TagKind,
    pub id: &'a str,
    pub tag_id: &'a str,
    pub color: &'a str,
    pub applied_at: Timestamp,
}

/// The full mark lists of one run, cloned out for callers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveMarks {
    pub fallacy_marks: Vec<FallacyMark>,
    pub rhetoric_marks: Vec<RhetoricMark>,
}

impl ActiveMarks {
    pub fn is_empty(&self) -> bool {
        self.fallacy_marks.is_empty() && self.rhetoric_marks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fallacy_marks.len() + self.rhetoric_marks.len()
    }
}

pub(crate) fn contains_tag<M: AnnotationMark>(marks: &[M], tag_id: &str) -> bool {
    marks.iter().any(|m| m.tag_id() == tag_id)
}

/// Drop later entries that repeat a tag id (first application wins)
pub(crate) fn dedup_by_tag<M: AnnotationMark>(marks: Vec<M>) -> Vec<M> {
    let mut kept: Vec<M> = Vec::with_capacity(marks.len());
    for mark in marks {
        if !contains_tag(&kept, mark.tag_id()) {
            kept.push(mark);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_json_shape() {
        let mark = FallacyMark::create("mark_1".into(), "straw-man".into(), "#FF6B6B".into(), 100);
        let json = serde_json::to_value(&mark).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "mark_1",
                "fallacyId": "straw-man",
                "color": "#FF6B6B",
                "appliedAt": 100
            })
        );

        let rhetoric: RhetoricMark = serde_json::from_value(serde_json::json!({
            "id": "mark_2",
            "rhetoricId": "urgency",
            "color": "#F59F00",
            "appliedAt": 200
        }))
        .unwrap();
        assert_eq!(rhetoric.view().kind, TagKind::Rhetoric);
        assert_eq!(rhetoric.view().tag_id, "urgency");
    }

    #[test]
    fn test_dedup_keeps_first() {
        let marks = vec![
            FallacyMark::create("a".into(), "x".into(), "#000000".into(), 1),
            FallacyMark::create("b".into(), "y".into(), "#000000".into(), 2),
            FallacyMark::create("c".into(), "x".into(), "#000000".into(), 3),
        ];
        let kept = dedup_by_tag(marks);
        let ids: Vec<&str> = kept.iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
