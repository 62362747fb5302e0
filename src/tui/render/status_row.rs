use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::StorageAdapter;
use crate::tui::app::{App, EditTarget, Mode};

/// Render the status row (bottom of screen)
pub fn render_status_row<S: StorageAdapter>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match app.mode {
        Mode::Navigate => {
            let left = match &app.status_message {
                Some(msg) => Span::styled(msg.clone(), Style::default().fg(app.theme.red).bg(bg)),
                None => {
                    let c = app.counts();
                    let noun = if c.total == 1 { "task" } else { "tasks" };
                    Span::styled(
                        format!(
                            "{} {} \u{00B7} {} active \u{00B7} {} completed",
                            c.total, noun, c.active, c.completed
                        ),
                        Style::default().fg(app.theme.dim).bg(bg),
                    )
                }
            };
            let hint = if app.show_key_hints {
                "a add  s sub  x toggle  m move  ? help"
            } else {
                ""
            };
            (vec![left], hint)
        }
        Mode::Edit => {
            let prompt = match app.edit_target {
                Some(EditTarget::Subtask { .. }) => "New subtask: ",
                _ => "New task: ",
            };
            let spans = vec![
                Span::styled(prompt, Style::default().fg(app.theme.dim).bg(bg)),
                Span::styled(
                    app.edit_buffer.clone(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            (spans, "Enter save  Esc cancel")
        }
        Mode::Drag => {
            let text = app
                .drag
                .source()
                .and_then(|s| app.store.get(s))
                .map(|t| t.text.clone())
                .unwrap_or_default();
            let spans = vec![
                Span::styled("Moving: ", Style::default().fg(app.theme.highlight).bg(bg)),
                Span::styled(text, Style::default().fg(app.theme.text_bright).bg(bg)),
            ];
            (spans, "jk target  m drop  Esc cancel")
        }
    };

    // Right-align the hint when it fits
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
