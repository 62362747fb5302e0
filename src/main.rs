use std::path::Path;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use twig::cli::commands::Cli;
use twig::cli::handlers;

/// Environment variable holding the log filter (e.g. `TWIG_LOG=debug`)
const LOG_ENV: &str = "TWIG_LOG";

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => run_tui(cli.dir.as_deref()),
        Some(_) => {
            init_stderr_logging();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// No subcommand: open the terminal UI on the discovered workspace
fn run_tui(dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let start = handlers::start_dir(dir)?;
    let workspace = handlers::load_workspace_from(&start)?;

    // Held until exit so buffered log lines are flushed
    let _guard = init_file_logging(&workspace.log_path());
    tracing::debug!(root = %workspace.root.display(), "starting terminal ui");

    twig::tui::run(workspace)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .with_target(false)
        .without_time()
        .init();
}

/// The terminal UI owns the screen, so logs go to `.twig/twig.log` instead.
fn init_file_logging(log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter())
        .with_ansi(false)
        .init();

    Some(guard)
}
