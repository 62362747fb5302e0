use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::io::storage::StorageAdapter;
use crate::model::filter::FilterMode;
use crate::tui::app::App;

/// Title plus one tab per filter mode, with a separator line below
pub fn render_filter_bar<S: StorageAdapter>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let bg = app.theme.background;
    let mut spans: Vec<Span> = vec![Span::styled(
        " twig ",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    for (i, mode) in FilterMode::ALL_MODES.iter().enumerate() {
        spans.push(Span::styled(
            "\u{2502}",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        let style = if *mode == app.filter {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab_label(*mode)), style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(separator).style(Style::default().fg(app.theme.dim).bg(bg)),
        chunks[1],
    );
}

fn tab_label(mode: FilterMode) -> &'static str {
    match mode {
        FilterMode::All => "All",
        FilterMode::Active => "Active",
        FilterMode::Completed => "Completed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{render_to_string, sample_app};

    #[test]
    fn tabs_show_numbers_and_labels() {
        let app = sample_app();
        let out = render_to_string(60, 2, |frame, area| {
            render_filter_bar(frame, &app, area);
        });
        assert_eq!(
            out.lines().next().unwrap(),
            " twig \u{2502} 1 All \u{2502} 2 Active \u{2502} 3 Completed"
        );
    }
}
