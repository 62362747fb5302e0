use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tw", about = concat!("twig v", env!("CARGO_PKG_VERSION"), " - tasks, subtasks, and drag to reorder"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .twig/ workspace in the current directory
    Init(InitArgs),
    /// List tasks through the current (or given) filter
    List(ListArgs),
    /// Add a top-level task
    Add(AddArgs),
    /// Add a subtask under a top-level task
    Sub(SubArgs),
    /// Toggle a task between active and completed
    Toggle(IdArgs),
    /// Delete a task (and its subtasks)
    Rm(IdArgs),
    /// Move a task: drop it onto another task, or place it explicitly
    Mv(MvArgs),
    /// Show or set the persisted filter (all, active, completed)
    Filter(FilterArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter to apply instead of the persisted one
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
}

#[derive(Args)]
pub struct SubArgs {
    /// Id of the top-level parent task
    pub parent: String,
    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task id
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Id of the task to move
    pub id: String,
    /// Drop onto this task: take its slot in its group
    #[arg(long, conflicts_with_all = ["top", "under"])]
    pub onto: Option<String>,
    /// Place at the top level
    #[arg(long, conflicts_with = "under")]
    pub top: bool,
    /// Place in this top-level task's subtasks
    #[arg(long)]
    pub under: Option<String>,
    /// Position in the destination (default: end)
    #[arg(long, conflicts_with = "onto")]
    pub index: Option<usize>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// New filter; prints the current one when omitted
    pub mode: Option<String>,
}
