mod drag_mode;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::io::storage::StorageAdapter;

use super::app::{App, Mode};

use drag_mode::handle_drag;
use edit::handle_edit;
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key<S: StorageAdapter>(app: &mut App<S>, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl-C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.cancel_drag();
        app.should_quit = true;
        return;
    }

    // Any key dismisses a pending status message
    app.status_message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Drag => handle_drag(app, key),
    }
}
