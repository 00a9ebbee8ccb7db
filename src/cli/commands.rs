use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jot", about = concat!("jot v", env!("CARGO_PKG_VERSION"), " - a to-do list that fits in a text file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (default: the platform data directory + /jot)
    #[arg(short = 'C', long = "dir", env = "JOT_DIR", global = true)]
    pub dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// List tasks, open ones first (default)
    List,
    /// Add a task
    Add(AddArgs),
    /// Mark a task done, or not done again
    Toggle(IdArgs),
    /// Delete a task
    Delete(IdArgs),
    /// Change a task's title
    Edit(EditArgs),
    /// Write the list as a numbered text file
    Export(ExportArgs),
    /// Import tasks from a numbered text file
    Import(ImportArgs),
    /// Apply JSON commands, one per line
    Apply(ApplyArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title (3 to 255 characters)
    pub title: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title (3 to 255 characters)
    pub title: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file, or - for stdout (default: the configured filename)
    pub path: Option<String>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Text file to import
    pub file: PathBuf,
    /// Import without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// File of JSON commands (default: stdin)
    pub file: Option<PathBuf>,
}
