pub mod filter_bar;
pub mod help_overlay;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use crate::io::storage::StorageAdapter;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render<S: StorageAdapter>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: filter bar (2 rows) | task list | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    filter_bar::render_filter_bar(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::test_helpers::{TERM_H, TERM_W, render_app, sample_app};

    #[test]
    fn full_screen_has_all_regions() {
        let mut app = sample_app();
        let out = render_app(&mut app, TERM_W, TERM_H);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("twig"));
        assert!(lines[0].contains("Completed"));
        assert!(out.contains("[ ] Groceries"));
        assert!(out.contains("3 tasks"));
    }

    #[test]
    fn help_overlay_draws_on_top() {
        let mut app = sample_app();
        app.show_help = true;
        let out = render_app(&mut app, TERM_W, TERM_H);
        assert!(out.contains("Key Bindings"));
        assert!(out.contains("Grab task to move"));
    }
}
