//! Built-in walkthrough document with a few marks already applied.

use crate::clock::Timestamp;
use crate::richtext::{
    AnnotatedDocument, AnnotationMark, Block, BlockKind, FallacyMark, TextRun, TextStyle,
};

pub const EXAMPLE_DOCUMENT_TITLE: &str = "Example: Analyzing a Political Debate";

fn marked(text: &str, mark_id: &str, fallacy_id: &str, color: &str, applied_at: Timestamp) -> TextRun {
    TextRun::plain(text).with_fallacy_mark(FallacyMark::create(
        mark_id.to_string(),
        fallacy_id.to_string(),
        color.to_string(),
        applied_at,
    ))
}

fn numbered(number: &str, name: &str, explanation: &str) -> Block {
    Block::paragraph()
        .with_text(number, TextStyle::bold())
        .with_text(name, TextStyle::bold())
        .with_plain_text(explanation)
}

/// The example debate, with marks stamped `applied_at`
pub fn example_document(applied_at: Timestamp) -> AnnotatedDocument {
    AnnotatedDocument::from_blocks(vec![
        Block::new(BlockKind::HeadingOne).with_plain_text("Welcome to Debate Dissector!"),
        Block::paragraph()
            .with_plain_text(
                "This example document demonstrates how to identify and mark logical fallacies \
                 and rhetorical techniques in arguments. ",
            )
            .with_text(
                "Select any text and use the sidebar to apply annotations.",
                TextStyle::italic(),
            ),
        Block::new(BlockKind::HeadingTwo).with_plain_text("Sample Argument with Fallacies"),
        Block::paragraph().with_plain_text(
            "Speaker A: \"We need to invest more in renewable energy to combat climate change.\"",
        ),
        Block::paragraph()
            .with_plain_text("Speaker B: \"")
            .with_run(marked(
                "So you want to destroy the entire oil industry and put millions of people out of work?",
                "mark_example_1",
                "straw-man",
                "#FF6B6B",
                applied_at,
            ))
            .with_plain_text(" That's ridiculous. ")
            .with_run(marked(
                "Besides, you drive a car yourself, so you're being hypocritical.",
                "mark_example_2",
                "tu-quoque",
                "#38D9A9",
                applied_at,
            ))
            .with_plain_text("\""),
        Block::paragraph().with_plain_text(
            "Speaker A: \"That's not what I said. I'm talking about gradual investment in\u{2014}\"",
        ),
        Block::paragraph()
            .with_plain_text("Speaker B: \"")
            .with_run(marked(
                "Either we keep using fossil fuels or the economy collapses.",
                "mark_example_3",
                "false-dilemma",
                "#FFA94D",
                applied_at,
            ))
            .with_plain_text(" ")
            .with_run(marked(
                "My friend who works at a gas station says green energy doesn't work.",
                "mark_example_4",
                "appeal-to-authority",
                "#A9E34B",
                applied_at,
            ))
            .with_plain_text("\""),
        Block::new(BlockKind::HeadingTwo).with_plain_text("Fallacies Identified"),
        numbered(
            "1. ",
            "Straw Man",
            " - Misrepresenting the opponent's position as wanting to \"destroy the entire oil industry\"",
        ),
        numbered(
            "2. ",
            "Tu Quoque",
            " - Attacking the speaker for driving a car instead of addressing the argument",
        ),
        numbered(
            "3. ",
            "False Dilemma",
            " - Presenting only two extreme options when many alternatives exist",
        ),
        numbered(
            "4. ",
            "Appeal to Authority",
            " - Citing a gas station worker as an authority on energy policy",
        ),
        Block::paragraph(),
        Block::paragraph().with_text(
            "Try clicking on the highlighted text to see details about each fallacy in the sidebar!",
            TextStyle::italic(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TagKind};

    #[test]
    fn test_example_marks_reference_catalog_tags() {
        let doc = example_document(42);
        let used = doc.used_tags();
        assert_eq!(
            used.fallacies,
            vec!["straw-man", "tu-quoque", "false-dilemma", "appeal-to-authority"]
        );
        assert!(used.rhetoric.is_empty());

        let catalog = Catalog::builtin();
        for id in &used.fallacies {
            assert!(catalog.find(TagKind::Fallacy, id).is_some(), "{id}");
        }
        assert_eq!(doc.total_mark_count(), 4);
    }

    #[test]
    fn test_example_structure() {
        let doc = example_document(0);
        assert_eq!(doc.block_count(), 14);
        assert_eq!(doc.blocks()[0].kind, BlockKind::HeadingOne);
        assert!(doc.blocks()[12].is_empty());
        assert!(doc.blocks()[1].children[1].style.italic);
    }
}
