use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::workspace;

pub fn cmd_init(start: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ws = workspace::init_workspace(start, args.force)?;
    println!("Initialized twig workspace in {}", ws.data_dir.display());
    Ok(())
}
