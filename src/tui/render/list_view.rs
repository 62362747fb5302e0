use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::checkbox;
use crate::io::storage::StorageAdapter;
use crate::model::filter::FilterMode;
use crate::tui::app::App;

/// Render the projected rows, keeping the cursor in view
pub fn render_list_view<S: StorageAdapter>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let visible_height = area.height as usize;
    let row_count = app.entries().len();

    app.cursor = app.cursor.min(row_count.saturating_sub(1));
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor.saturating_sub(visible_height.saturating_sub(1));
    }

    let bg = app.theme.background;
    if row_count == 0 {
        let msg = match app.filter {
            FilterMode::All => " No tasks. Press a to add one.",
            FilterMode::Active => " Nothing active.",
            FilterMode::Completed => " Nothing completed yet.",
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let entries = app.entries();
    let source = app.drag.source();
    let hint = app.drag.hint();
    let scroll = app.scroll_offset;
    let end = entries.len().min(scroll + visible_height);
    let width = area.width as usize;

    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    for (entry, row) in entries[scroll..end].iter().zip(scroll..end) {
        let task_ref = entry.task_ref();
        let is_cursor = row == app.cursor;
        let is_source = source.is_some_and(|s| s.same_row(&task_ref));
        let is_hint = hint.is_some_and(|h| h.same_row(&task_ref));

        let row_bg = if is_hint {
            app.theme.drop_hint_bg
        } else if is_cursor {
            app.theme.selection_bg
        } else {
            bg
        };
        let base = Style::default().bg(row_bg);

        let marker = if is_hint {
            "\u{25B8}"
        } else if is_source {
            "\u{2195}"
        } else {
            " "
        };
        let indent = if entry.is_subtask { "   " } else { " " };

        let text_style = if is_source {
            base.fg(app.theme.highlight).add_modifier(Modifier::BOLD)
        } else if entry.task.completed {
            base.fg(app.theme.dim).add_modifier(Modifier::CROSSED_OUT)
        } else if is_cursor {
            base.fg(app.theme.text_bright)
        } else {
            base.fg(app.theme.text)
        };

        let mut spans = vec![
            Span::styled(marker, base.fg(app.theme.highlight)),
            Span::styled(indent, base),
            Span::styled(
                checkbox(entry.task.completed),
                base.fg(app.theme.checkbox_color(entry.task.completed)),
            ),
            Span::styled(" ", base),
            Span::styled(entry.task.text.clone(), text_style),
        ];

        // Fill the rest of the row so highlights span the full width
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        if used < width {
            spans.push(Span::styled(" ".repeat(width - used), base));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
