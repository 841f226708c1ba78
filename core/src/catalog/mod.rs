// Tag Catalog
// Two independent, read-only taxonomies: fallacies and rhetoric techniques.

mod fallacies;
mod rhetoric;

pub use fallacies::FALLACIES;
pub use rhetoric::RHETORIC_TECHNIQUES;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color pattern"));

/// Check for a `#RRGGBB` color string
pub fn is_hex_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Which taxonomy a tag or mark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Fallacy,
    Rhetoric,
}

impl TagKind {
    pub const ALL: [TagKind; 2] = [TagKind::Fallacy, TagKind::Rhetoric];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Fallacy => "fallacy",
            TagKind::Rhetoric => "rhetoric",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallacyCategory {
    Formal,
    Informal,
    RedHerring,
    Propositional,
    Quantification,
    Syllogistic,
    FaultyGeneralization,
    Conditional,
}

impl FallacyCategory {
    pub const ALL: [FallacyCategory; 8] = [
        FallacyCategory::Formal,
        FallacyCategory::Informal,
        FallacyCategory::RedHerring,
        FallacyCategory::Propositional,
        FallacyCategory::Quantification,
        FallacyCategory::Syllogistic,
        FallacyCategory::FaultyGeneralization,
        FallacyCategory::Conditional,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FallacyCategory::Formal => "Formal Fallacies",
            FallacyCategory::Informal => "Informal Fallacies",
            FallacyCategory::RedHerring => "Red Herring Fallacies",
            FallacyCategory::Propositional => "Propositional Fallacies",
            FallacyCategory::Quantification => "Quantification Fallacies",
            FallacyCategory::Syllogistic => "Formal Syllogistic Fallacies",
            FallacyCategory::FaultyGeneralization => "Faulty Generalizations",
            FallacyCategory::Conditional => "Conditional or Questionable Fallacies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RhetoricCategory {
    Ethos,
    Pathos,
    Logos,
    Kairos,
}

impl RhetoricCategory {
    pub const ALL: [RhetoricCategory; 4] = [
        RhetoricCategory::Ethos,
        RhetoricCategory::Pathos,
        RhetoricCategory::Logos,
        RhetoricCategory::Kairos,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            RhetoricCategory::Ethos => "Ethos (Credibility)",
            RhetoricCategory::Pathos => "Pathos (Emotional)",
            RhetoricCategory::Logos => "Logos (Logical)",
            RhetoricCategory::Kairos => "Kairos (Timing)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RhetoricCategory::Ethos => "Appeals to authority, character, or trustworthiness",
            RhetoricCategory::Pathos => "Appeals to emotions, values, or desires",
            RhetoricCategory::Logos => "Appeals to logic, reason, and evidence",
            RhetoricCategory::Kairos => "Appeals to timeliness and appropriateness",
        }
    }
}

/// Category of a tag, tagged with its taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Fallacy(FallacyCategory),
    Rhetoric(RhetoricCategory),
}

impl Category {
    pub fn kind(&self) -> TagKind {
        match self {
            Category::Fallacy(_) => TagKind::Fallacy,
            Category::Rhetoric(_) => TagKind::Rhetoric,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Fallacy(c) => c.display_name(),
            Category::Rhetoric(c) => c.display_name(),
        }
    }

    fn all(kind: TagKind) -> Vec<Category> {
        match kind {
            TagKind::Fallacy => FallacyCategory::ALL
                .iter()
                .map(|c| Category::Fallacy(*c))
                .collect(),
            TagKind::Rhetoric => RhetoricCategory::ALL
                .iter()
                .map(|c| Category::Rhetoric(*c))
                .collect(),
        }
    }
}

/// A named, colored taxonomy entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub color: &'static str,
    pub examples: &'static [&'static str],
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        self.category.kind()
    }
}

/// A problem found while validating catalog data
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("{kind} tag #{index} has an empty {field}")]
    EmptyField {
        kind: TagKind,
        index: usize,
        field: &'static str,
    },
    #[error("{kind} tag '{id}' has invalid color '{color}'")]
    InvalidColor {
        kind: TagKind,
        id: &'static str,
        color: &'static str,
    },
    #[error("{kind} tag id '{id}' is used more than once")]
    DuplicateId { kind: TagKind, id: &'static str },
    #[error("{kind} tag name '{name}' is used more than once")]
    DuplicateName { kind: TagKind, name: &'static str },
    #[error("{kind} tag '{id}' sits in a {found} category")]
    WrongTaxonomy {
        kind: TagKind,
        id: &'static str,
        found: TagKind,
    },
}

/// Read access to both taxonomies
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    fallacies: &'static [Tag],
    rhetoric: &'static [Tag],
}

impl Catalog {
    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self::new(FALLACIES, RHETORIC_TECHNIQUES)
    }

    pub fn new(fallacies: &'static [Tag], rhetoric: &'static [Tag]) -> Self {
        Catalog {
            fallacies,
            rhetoric,
        }
    }

    pub fn tags(&self, kind: TagKind) -> &'static [Tag] {
        match kind {
            TagKind::Fallacy => self.fallacies,
            TagKind::Rhetoric => self.rhetoric,
        }
    }

    pub fn find(&self, kind: TagKind, id: &str) -> Option<&'static Tag> {
        self.tags(kind).iter().find(|t| t.id == id)
    }

    pub fn name_of(&self, kind: TagKind, id: &str) -> Option<&'static str> {
        self.find(kind, id).map(|t| t.name)
    }

    /// Tags grouped by category, in category declaration order. Empty categories are skipped.
    pub fn by_category(&self, kind: TagKind) -> Vec<(Category, Vec<&'static Tag>)> {
        Category::all(kind)
            .into_iter()
            .filter_map(|category| {
                let tags: Vec<&'static Tag> = self
                    .tags(kind)
                    .iter()
                    .filter(|t| t.category == category)
                    .collect();
                (!tags.is_empty()).then_some((category, tags))
            })
            .collect()
    }

    /// Check every entry of both taxonomies. Returns all issues found.
    pub fn validate(&self) -> Result<(), Vec<CatalogIssue>> {
        let mut issues = Vec::new();

        for kind in TagKind::ALL {
            let mut ids = HashSet::new();
            let mut names = HashSet::new();

            for (index, tag) in self.tags(kind).iter().enumerate() {
                for (field, value) in [
                    ("id", tag.id),
                    ("name", tag.name),
                    ("description", tag.description),
                ] {
                    if value.trim().is_empty() {
                        issues.push(CatalogIssue::EmptyField { kind, index, field });
                    }
                }
                if !is_hex_color(tag.color) {
                    issues.push(CatalogIssue::InvalidColor {
                        kind,
                        id: tag.id,
                        color: tag.color,
                    });
                }
                if tag.kind() != kind {
                    issues.push(CatalogIssue::WrongTaxonomy {
                        kind,
                        id: tag.id,
                        found: tag.kind(),
                    });
                }
                if !ids.insert(tag.id) {
                    issues.push(CatalogIssue::DuplicateId { kind, id: tag.id });
                }
                if !names.insert(tag.name) {
                    issues.push(CatalogIssue::DuplicateName {
                        kind,
                        name: tag.name,
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert_eq!(Catalog::builtin().validate(), Ok(()));
    }

    #[test]
    fn test_builtin_sizes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.tags(TagKind::Fallacy).len(), 18);
        assert_eq!(catalog.tags(TagKind::Rhetoric).len(), 18);
    }

    #[test]
    fn test_taxonomies_are_independent() {
        // "appeal-to-authority" exists in both with different colors
        let catalog = Catalog::builtin();
        let fallacy = catalog.find(TagKind::Fallacy, "appeal-to-authority").unwrap();
        let rhetoric = catalog.find(TagKind::Rhetoric, "appeal-to-authority").unwrap();
        assert_eq!(fallacy.kind(), TagKind::Fallacy);
        assert_eq!(rhetoric.kind(), TagKind::Rhetoric);
        assert_ne!(fallacy.color, rhetoric.color);
    }

    #[test]
    fn test_find_and_name_of() {
        let catalog = Catalog::builtin();
        let straw_man = catalog.find(TagKind::Fallacy, "straw-man").unwrap();
        assert_eq!(straw_man.color, "#FF6B6B");
        assert_eq!(
            straw_man.category,
            Category::Fallacy(FallacyCategory::Informal)
        );
        assert_eq!(catalog.name_of(TagKind::Rhetoric, "urgency"), Some("Urgency"));
        assert!(catalog.find(TagKind::Rhetoric, "straw-man").is_none());
    }

    #[test]
    fn test_by_category_covers_every_tag() {
        let catalog = Catalog::builtin();
        for kind in TagKind::ALL {
            let groups = catalog.by_category(kind);
            let total: usize = groups.iter().map(|(_, tags)| tags.len()).sum();
            assert_eq!(total, catalog.tags(kind).len());
            assert!(groups.len() > 1);
        }
        let rhetoric = catalog.by_category(TagKind::Rhetoric);
        assert_eq!(rhetoric[0].0.display_name(), "Ethos (Credibility)");
    }

    #[test]
    fn test_hex_color() {
        assert!(is_hex_color("#FF6B6B"));
        assert!(is_hex_color("#a1b2c3"));
        assert!(!is_hex_color("FF6B6B"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("#GG0000"));
    }

    static BROKEN: &[Tag] = &[
        Tag {
            id: "dup",
            name: "Dup",
            description: "",
            category: Category::Fallacy(FallacyCategory::Formal),
            color: "red",
            examples: &[],
        },
        Tag {
            id: "dup",
            name: "Other",
            description: "fine",
            category: Category::Rhetoric(RhetoricCategory::Logos),
            color: "#000000",
            examples: &[],
        },
    ];

    #[test]
    fn test_validate_reports_issues() {
        let catalog = Catalog::new(BROKEN, &[]);
        let issues = catalog.validate().unwrap_err();
        assert!(issues.contains(&CatalogIssue::EmptyField {
            kind: TagKind::Fallacy,
            index: 0,
            field: "description",
        }));
        assert!(issues.contains(&CatalogIssue::InvalidColor {
            kind: TagKind::Fallacy,
            id: "dup",
            color: "red",
        }));
        assert!(issues.contains(&CatalogIssue::DuplicateId {
            kind: TagKind::Fallacy,
            id: "dup",
        }));
        assert!(issues.contains(&CatalogIssue::WrongTaxonomy {
            kind: TagKind::Fallacy,
            id: "dup",
            found: TagKind::Rhetoric,
        }));
    }
}
