use crossterm::event::{KeyCode, KeyEvent};

use crate::io::storage::StorageAdapter;
use crate::tui::app::App;

/// Single-line text entry for a new task or subtask
pub(super) fn handle_edit<S: StorageAdapter>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Backspace => {
            app.edit_buffer.pop();
        }
        KeyCode::Char(c) => app.edit_buffer.push(c),
        _ => {}
    }
}
