use dissector_core::catalog::Catalog;
use dissector_core::richtext::{resolve_display, AnnotatedDocument, BlockKind, TextRun};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parse `#RRGGBB` into a terminal color
pub fn parse_hex_color(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn run_style(run: &TextRun) -> Style {
    let mut style = Style::default();
    if run.style.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if run.style.italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if run.style.underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if run.style.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    style
}

fn block_prefix(kind: BlockKind) -> (&'static str, Style) {
    match kind {
        BlockKind::Paragraph => ("", Style::default()),
        BlockKind::HeadingOne => ("# ", Style::default().add_modifier(Modifier::BOLD)),
        BlockKind::HeadingTwo => ("## ", Style::default().add_modifier(Modifier::BOLD)),
        BlockKind::BlockQuote => ("> ", Style::default().add_modifier(Modifier::DIM)),
    }
}

/// One line per block. Highlighted runs get their resolved color as background and
/// an overflow badge when more marks are stacked underneath.
///
/// With `brackets`, highlighted text is also wrapped in `[` `]` so it stays visible
/// when printed without colors.
pub fn render_document(
    doc: &AnnotatedDocument,
    catalog: &Catalog,
    brackets: bool,
) -> Vec<Line<'static>> {
    let badge_style = Style::default()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD);

    doc.blocks()
        .iter()
        .map(|block| {
            let (prefix, block_style) = block_prefix(block.kind);
            let mut spans = Vec::new();
            if !prefix.is_empty() {
                spans.push(Span::styled(prefix, block_style));
            }
            for run in &block.children {
                if run.is_empty() {
                    continue;
                }
                let display = resolve_display(run, catalog);
                let mut style = block_style.patch(run_style(run));
                if let Some(bg) = display.color.as_deref().and_then(parse_hex_color) {
                    style = style.bg(bg).fg(Color::Black);
                }
                let text = if brackets && display.is_highlighted() {
                    format!("[{}]", run.text)
                } else {
                    run.text.clone()
                };
                spans.push(Span::styled(text, style));
                if let Some(label) = display.badge_label() {
                    spans.push(Span::styled(format!(" {label} "), badge_style));
                }
            }
            Line::from(spans)
        })
        .collect()
}

pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dissector_core::example_document::example_document;
    use dissector_core::richtext::{AnnotationMark, Block, FallacyMark, RhetoricMark};

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF6B6B"), Some(Color::Rgb(0xFF, 0x6B, 0x6B)));
        assert_eq!(parse_hex_color("FF6B6B"), None);
        assert_eq!(parse_hex_color("#FF6B"), None);
        assert_eq!(parse_hex_color("#GG6B6B"), None);
    }

    #[test]
    fn test_render_headings_and_brackets() {
        let lines = render_document(&example_document(0), &Catalog::builtin(), true);
        assert_eq!(line_text(&lines[0]), "# Welcome to Debate Dissector!");
        assert_eq!(line_text(&lines[2]), "## Sample Argument with Fallacies");
        assert!(line_text(&lines[4]).starts_with("Speaker B: \"[So you want"));
        assert_eq!(line_text(&lines[12]), "");
    }

    #[test]
    fn test_render_badge_for_stacked_marks() {
        let run = TextRun::plain("now or never")
            .with_fallacy_mark(FallacyMark::create("m1".into(), "false-dilemma".into(), "#FFA94D".into(), 100))
            .with_rhetoric_mark(RhetoricMark::create("m2".into(), "urgency".into(), "#E64980".into(), 200));
        let doc = AnnotatedDocument::from_blocks(vec![Block::paragraph().with_run(run)]);

        let lines = render_document(&doc, &Catalog::builtin(), false);
        assert_eq!(line_text(&lines[0]), "now or never +1 ");
        assert_eq!(lines[0].spans[0].style.bg, Some(Color::Rgb(0xE6, 0x49, 0x80)));
    }
}
