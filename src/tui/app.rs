use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::io::storage::{FileStorage, StorageAdapter};
use crate::io::workspace::Workspace;
use crate::model::config::WorkspaceConfig;
use crate::model::filter::FilterMode;
use crate::model::task::TaskRef;
use crate::ops::drag::DragEngine;
use crate::ops::projection::{self, Counts, Entry};
use crate::ops::task_store::TaskStore;

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing the text of a new task
    Edit,
    /// A drag gesture is in progress
    Drag,
}

/// What the edit buffer will become when submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Task,
    Subtask { parent_id: String },
}

/// Main application state
pub struct App<S: StorageAdapter> {
    pub store: TaskStore<S>,
    pub drag: DragEngine,
    pub filter: FilterMode,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the projected rows
    pub cursor: usize,
    /// Scroll offset (first visible row)
    pub scroll_offset: usize,
    pub edit_target: Option<EditTarget>,
    pub edit_buffer: String,
    /// One-shot message in the status row
    pub status_message: Option<String>,
    pub show_help: bool,
    pub show_key_hints: bool,
    /// Where `.state.json` lives; `None` keeps UI state in memory only
    pub state_dir: Option<PathBuf>,
}

impl<S: StorageAdapter> App<S> {
    pub fn new(store: TaskStore<S>, config: &WorkspaceConfig) -> Self {
        App {
            store,
            drag: DragEngine::new(),
            filter: FilterMode::parse_selector(&config.ui.default_filter),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            cursor: 0,
            scroll_offset: 0,
            edit_target: None,
            edit_buffer: String::new(),
            status_message: None,
            show_help: false,
            show_key_hints: config.ui.show_key_hints,
            state_dir: None,
        }
    }

    /// Rows visible under the current filter
    pub fn entries(&self) -> Vec<Entry<'_>> {
        self.store.project(self.filter)
    }

    pub fn counts(&self) -> Counts {
        projection::counts(self.store.tasks())
    }

    /// Address of the row under the cursor
    pub fn cursor_ref(&self) -> Option<TaskRef> {
        self.entries().get(self.cursor).map(Entry::task_ref)
    }

    /// Top-level task owning the row under the cursor
    pub fn cursor_top_level_id(&self) -> Option<String> {
        let entries = self.entries();
        let entry = entries.get(self.cursor)?;
        Some(entry.parent.unwrap_or(entry.task).id.clone())
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.entries().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on the row showing `id`, if it is visible
    pub fn select_id(&mut self, id: &str) {
        let found = self.entries().iter().position(|e| e.task.id == id);
        match found {
            Some(idx) => self.cursor = idx,
            None => self.clamp_cursor(),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.entries().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        if self.mode == Mode::Drag {
            self.hover_cursor();
        }
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        let current = self.cursor_ref();
        self.filter = mode;
        match current {
            Some(task) => self.select_id(&task.id),
            None => self.clamp_cursor(),
        }
        if self.mode == Mode::Drag {
            self.hover_cursor();
        }
    }

    /// Surface a failed save; the in-memory tree stays authoritative.
    fn after_mutation(&mut self) {
        if let Some(err) = self.store.last_save_error() {
            self.status_message = Some(format!("not saved: {}", err));
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    pub fn begin_add(&mut self, target: EditTarget) {
        self.edit_target = Some(target);
        self.edit_buffer.clear();
        self.mode = Mode::Edit;
    }

    pub fn submit_edit(&mut self) {
        let target = self.edit_target.take();
        let text = std::mem::take(&mut self.edit_buffer);
        self.mode = Mode::Navigate;

        let new_id = match target {
            Some(EditTarget::Task) => self.store.add_task(&text),
            Some(EditTarget::Subtask { parent_id }) => self.store.add_subtask(&parent_id, &text),
            None => None,
        };
        if let Some(id) = new_id {
            self.select_id(&id);
            self.after_mutation();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.edit_buffer.clear();
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // Row actions
    // -----------------------------------------------------------------------

    pub fn toggle_at_cursor(&mut self) {
        let Some(task) = self.cursor_ref() else {
            return;
        };
        if self.store.toggle_completed(&task) {
            // The row may drop out of the current filter
            self.clamp_cursor();
            self.after_mutation();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let Some(task) = self.cursor_ref() else {
            return;
        };
        if self.store.delete_task(&task) {
            self.clamp_cursor();
            self.after_mutation();
        }
    }

    // -----------------------------------------------------------------------
    // Drag gestures
    // -----------------------------------------------------------------------

    pub fn grab(&mut self) {
        let Some(source) = self.cursor_ref() else {
            return;
        };
        self.drag.start(source);
        self.mode = Mode::Drag;
    }

    /// Hover the drag over the cursor row
    pub fn hover_cursor(&mut self) {
        match self.cursor_ref() {
            Some(target) => {
                self.drag.over(&target);
            }
            None => self.drag.leave(),
        }
    }

    pub fn drop_at_cursor(&mut self) {
        let source_id = self.drag.source().map(|s| s.id.clone());
        let moved = match self.cursor_ref() {
            Some(target) => self.drag.drop_on(&target, &mut self.store),
            None => {
                self.drag.cancel();
                false
            }
        };
        self.mode = Mode::Navigate;
        if moved {
            if let Some(id) = source_id {
                self.select_id(&id);
            }
            self.after_mutation();
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
        self.mode = Mode::Navigate;
    }

    // -----------------------------------------------------------------------
    // UI state
    // -----------------------------------------------------------------------

    pub fn restore_ui_state(&mut self, config: &WorkspaceConfig) {
        let Some(dir) = &self.state_dir else {
            return;
        };
        let Some(state) = read_ui_state(dir) else {
            return;
        };
        self.filter = state.filter_mode(config);
        self.cursor = state.cursor;
        self.clamp_cursor();
    }

    /// Save UI state to .state.json
    pub fn save_ui_state(&self) {
        let Some(dir) = &self.state_dir else {
            return;
        };
        let mut state = UiState {
            cursor: self.cursor,
            ..Default::default()
        };
        state.set_filter(self.filter);
        if let Err(e) = write_ui_state(dir, &state) {
            tracing::warn!(error = %e, "could not save ui state");
        }
    }
}

/// Run the TUI application
pub fn run(workspace: Workspace) -> Result<(), Box<dyn std::error::Error>> {
    let store: TaskStore<FileStorage> = workspace.open_store();
    let mut app = App::new(store, &workspace.config);
    app.state_dir = Some(workspace.data_dir.clone());

    // Restore saved UI state
    app.restore_ui_state(&workspace.config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Save UI state before exit
    app.save_ui_state();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: StorageAdapter>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_filter = app.filter;
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
            if app.filter != last_filter {
                app.save_ui_state();
                last_filter = app.filter;
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
