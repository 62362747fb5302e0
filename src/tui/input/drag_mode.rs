use crossterm::event::{KeyCode, KeyEvent};

use crate::io::storage::StorageAdapter;
use crate::tui::app::App;

/// Keys while a row is grabbed: the cursor is the pointer, `m`/Enter drops.
pub(super) fn handle_drag<S: StorageAdapter>(app: &mut App<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('g') | KeyCode::Home => app.move_cursor(isize::MIN),
        KeyCode::Char('G') | KeyCode::End => app.move_cursor(isize::MAX),
        KeyCode::Char('m') | KeyCode::Enter => app.drop_at_cursor(),
        KeyCode::Esc => app.cancel_drag(),
        KeyCode::Char('q') => {
            app.cancel_drag();
            app.should_quit = true;
        }
        _ => {}
    }
}
