use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame, Terminal,
};
use std::io;

use crate::render::line_text;

struct PagerState {
    scroll_offset: usize,
    total_lines: usize,
    viewport_height: usize,
}

impl PagerState {
    fn new(total_lines: usize, viewport_height: usize) -> Self {
        Self {
            scroll_offset: 0,
            total_lines,
            viewport_height,
        }
    }

    fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }

    /// Move by `delta` lines, clamped to the content
    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll_offset.saturating_add_signed(delta);
        self.scroll_offset = target.min(self.max_scroll());
    }

    fn page(&self) -> isize {
        self.viewport_height.max(1) as isize
    }
}

/// Render the pager UI
fn render_pager(frame: &mut Frame, title: &str, content: &[Line<'static>], state: &mut PagerState) {
    let area = frame.area();

    // Update viewport height based on available space (minus borders and status bar)
    state.viewport_height = area.height.saturating_sub(3) as usize;

    // Create layout with main content area and status bar
    let chunks = Layout::default()
        .constraints([
            Constraint::Min(0),      // Content area
            Constraint::Length(1),   // Status bar
        ])
        .split(area);

    // Prepare content lines for display
    let visible_lines: Vec<Line> = content
        .iter()
        .skip(state.scroll_offset)
        .take(state.viewport_height)
        .cloned()
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title))
            .title_bottom(" q quit, j/k scroll, PgUp/PgDn, g/G "),
    );

    frame.render_widget(paragraph, chunks[0]);

    // Render scrollbar if content is larger than viewport
    if state.total_lines > state.viewport_height {
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));

        let mut scrollbar_state = ScrollbarState::default()
            .content_length(state.total_lines)
            .viewport_content_length(state.viewport_height)
            .position(state.scroll_offset);

        let scrollbar_area = Rect {
            x: chunks[0].x + chunks[0].width - 1,
            y: chunks[0].y + 1,
            width: 1,
            height: chunks[0].height.saturating_sub(2),
        };

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    // Status bar showing position
    let position_text = if state.total_lines > 0 {
        let percentage = if state.total_lines <= state.viewport_height {
            100
        } else {
            (state.scroll_offset * 100) / state.max_scroll()
        };
        format!(
            " Line {}/{} ({}%)",
            state.scroll_offset + 1,
            state.total_lines,
            percentage
        )
    } else {
        " (empty)".to_string()
    };

    let status_bar = Paragraph::new(position_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, chunks[1]);
}

/// Handle keyboard events for the pager
fn handle_key_event(key_event: KeyEvent, state: &mut PagerState) -> bool {
    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => return false, // Quit
        KeyCode::Down | KeyCode::Char('j') => state.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => state.scroll_by(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => state.scroll_by(state.page()),
        KeyCode::PageUp => state.scroll_by(-state.page()),
        KeyCode::Home | KeyCode::Char('g') => state.scroll_offset = 0,
        KeyCode::End | KeyCode::Char('G') => state.scroll_offset = state.max_scroll(),
        _ => {}
    }
    true // Continue running
}

/// Run the interactive pager
fn run_interactive_pager(title: &str, content: &[Line<'static>]) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize pager state
    let total_lines = content.len();
    let viewport_height = terminal.size()?.height.saturating_sub(3) as usize;
    let mut state = PagerState::new(total_lines, viewport_height);

    // Main event loop
    let result = loop {
        terminal.draw(|frame| render_pager(frame, title, content, &mut state))?;

        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key_event) = event::read()?
            && !handle_key_event(key_event, &mut state)
        {
            break Ok(());
        }
    };

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Check if stdout is an interactive terminal
fn is_interactive_terminal() -> bool {
    use std::io::IsTerminal;
    io::stdout().is_terminal()
}

/// Show `styled` in the interactive pager when stdout is a terminal too small to
/// hold it, otherwise print the text of `plain`
pub fn page_lines(title: &str, styled: &[Line<'static>], plain: &[Line<'static>]) -> io::Result<()> {
    let should_page = is_interactive_terminal()
        && match crossterm::terminal::size() {
            // Borders and status bar take three rows
            Ok((_, height)) => styled.len() > (height as usize).saturating_sub(3),
            Err(_) => false,
        };

    if should_page {
        run_interactive_pager(title, styled)
    } else {
        for line in plain {
            println!("{}", line_text(line));
        }
        Ok(())
    }
}
