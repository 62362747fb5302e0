use crossterm::event::{KeyCode, KeyEvent};

use crate::io::storage::StorageAdapter;
use crate::model::filter::FilterMode;
use crate::tui::app::{App, EditTarget};

pub(super) fn handle_navigate<S: StorageAdapter>(app: &mut App<S>, key: KeyEvent) {
    // Help overlay intercepts ? and Esc
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Cursor
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.cursor = 0,
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),

        // Tasks
        KeyCode::Char('a') => app.begin_add(EditTarget::Task),
        KeyCode::Char('s') => {
            if let Some(parent_id) = app.cursor_top_level_id() {
                app.begin_add(EditTarget::Subtask { parent_id });
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_at_cursor(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_at_cursor(),
        KeyCode::Char('m') => app.grab(),

        // Filters
        KeyCode::Char('1') => app.set_filter(FilterMode::All),
        KeyCode::Char('2') => app.set_filter(FilterMode::Active),
        KeyCode::Char('3') => app.set_filter(FilterMode::Completed),
        _ => {}
    }
}
