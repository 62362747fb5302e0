use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::storage::{MemoryStorage, StorageAdapter};
use crate::model::config::WorkspaceConfig;
use crate::model::task::Task;
use crate::ops::task_store::TaskStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole screen for `app`.
pub fn render_app(app: &mut App<MemoryStorage>, w: u16, h: u16) -> String {
    render_to_string(w, h, |frame, _area| {
        crate::tui::render::render(frame, app);
    })
}

/// `Groceries [Milk (done)]`, `Laundry`
pub fn sample_app() -> App<MemoryStorage> {
    let mut groceries = Task::top_level("G".into(), "Groceries".into());
    let mut milk = Task::subtask("M".into(), "Milk".into());
    milk.completed = true;
    groceries.subtasks = Some(vec![milk]);
    let laundry = Task::top_level("L".into(), "Laundry".into());

    let mut storage = MemoryStorage::default();
    storage.save(&[groceries, laundry]).unwrap();
    App::new(TaskStore::load(storage), &WorkspaceConfig::default())
}
