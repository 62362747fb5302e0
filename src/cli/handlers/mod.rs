mod init;
pub use init::cmd_init;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::state::{read_ui_state, write_ui_state};
use crate::io::storage::StorageAdapter;
use crate::io::workspace::{self, Workspace, WorkspaceError};
use crate::model::filter::FilterMode;
use crate::ops::drag::DragEngine;
use crate::ops::projection;
use crate::ops::task_store::TaskStore;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let start = start_dir(cli.dir.as_deref())?;

    match cli.command {
        // The terminal UI is launched from main.rs, which owns its file logger
        None => Err("no command given (run `tw` without arguments for the terminal UI)".into()),
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(&start, args),
            Commands::List(args) => cmd_list(&load_workspace_from(&start)?, args, json),
            Commands::Add(args) => cmd_add(&load_workspace_from(&start)?, args, json),
            Commands::Sub(args) => cmd_sub(&load_workspace_from(&start)?, args, json),
            Commands::Toggle(args) => cmd_toggle(&load_workspace_from(&start)?, args, json),
            Commands::Rm(args) => cmd_rm(&load_workspace_from(&start)?, args, json),
            Commands::Mv(args) => cmd_mv(&load_workspace_from(&start)?, args, json),
            Commands::Filter(args) => cmd_filter(&load_workspace_from(&start)?, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directory to start workspace discovery from (`-C` or the cwd)
pub fn start_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(dir) => Ok(std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

pub fn load_workspace_from(start: &Path) -> Result<Workspace, WorkspaceError> {
    let root = workspace::discover_workspace(start)?;
    workspace::load_workspace(&root)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Saves never fail a command; surface the problem on stderr instead.
fn warn_on_save_error<S: StorageAdapter>(store: &TaskStore<S>) {
    if let Some(err) = store.last_save_error() {
        eprintln!("warning: changes were not saved: {}", err);
    }
}

fn print_changed(changed: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        print_json(&ChangedJson { changed })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ws: &Workspace, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mode = match args.filter {
        Some(ref f) => FilterMode::parse_selector(f),
        None => read_ui_state(&ws.data_dir)
            .unwrap_or_default()
            .filter_mode(&ws.config),
    };

    let store = ws.open_store();
    let entries = store.project(mode);
    let counts = projection::counts(store.tasks());

    if json {
        return print_json(&list_to_json(&entries, counts, mode));
    }

    for entry in &entries {
        println!("{}", format_entry_line(entry));
    }
    if !entries.is_empty() {
        println!();
    }
    println!("{}", format_footer(counts, mode));
    Ok(())
}

fn cmd_filter(
    ws: &Workspace,
    args: FilterArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = read_ui_state(&ws.data_dir).unwrap_or_default();
    let mode = match args.mode {
        Some(ref selector) => {
            let mode = FilterMode::parse_selector(selector);
            state.set_filter(mode);
            write_ui_state(&ws.data_dir, &state)?;
            mode
        }
        None => state.filter_mode(&ws.config),
    };

    if json {
        print_json(&FilterJson { filter: mode })
    } else {
        println!("{}", mode);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ws: &Workspace, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store();
    let id = store.add_task(&args.text);
    warn_on_save_error(&store);

    if json {
        return print_json(&CreatedJson {
            id,
            parent_id: None,
        });
    }
    if let Some(id) = id {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_sub(ws: &Workspace, args: SubArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store();
    let id = store.add_subtask(&args.parent, &args.text);
    warn_on_save_error(&store);

    if json {
        return print_json(&CreatedJson {
            id,
            parent_id: Some(args.parent),
        });
    }
    if let Some(id) = id {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_toggle(ws: &Workspace, args: IdArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store();
    let changed = match store.locate(&args.id) {
        Some(task) => store.toggle_completed(&task),
        None => false,
    };
    warn_on_save_error(&store);
    print_changed(changed, json)
}

fn cmd_rm(ws: &Workspace, args: IdArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store();
    let changed = match store.locate(&args.id) {
        Some(task) => store.delete_task(&task),
        None => false,
    };
    warn_on_save_error(&store);
    print_changed(changed, json)
}

fn cmd_mv(ws: &Workspace, args: MvArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if args.onto.is_none() && !args.top && args.under.is_none() {
        return Err("mv needs a destination: --onto <ID>, --top or --under <PARENT>".into());
    }

    let mut store = ws.open_store();
    let changed = match store.locate(&args.id) {
        None => false,
        Some(source) => match args.onto {
            // A drop onto another row, exactly as the terminal UI performs it
            Some(ref onto) => match store.locate(onto) {
                Some(target) => {
                    let mut engine = DragEngine::new();
                    engine.start(source);
                    engine.over(&target);
                    engine.drop_on(&target, &mut store)
                }
                None => false,
            },
            None => {
                let index = args.index.unwrap_or(usize::MAX);
                store.move_task(&source, args.under.as_deref(), index)
            }
        },
    };
    warn_on_save_error(&store);
    print_changed(changed, json)
}
