use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "tt", about = concat!("traytodo v", env!("CARGO_PKG_VERSION"), " - a small to-do list with a dated archive"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory (default: $TRAYTODO_HOME, else the executable's directory)
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List active tasks (default)
    List,
    /// Add a task
    Add(AddArgs),
    /// Mark a task done
    Check(IdArg),
    /// Mark a task not done
    Uncheck(IdArg),
    /// Change a task's text
    Edit(EditArgs),
    /// Toggle the important flag
    Important(IdArg),
    /// Permanently delete tasks
    Delete(DeleteArgs),
    /// Show the archive, or manage it
    Archive(ArchiveCmd),
    /// Show the about text
    About,
    /// Stay running: refresh on date change and on outside edits
    Watch,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID (or a unique prefix of it)
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID (or a unique prefix of it)
    pub id: String,
    /// New text (words are joined with spaces)
    #[arg(required = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ArchiveCmd {
    #[command(subcommand)]
    pub action: Option<ArchiveAction>,
}

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// Move every done task into the archive now
    Done,
    /// Permanently delete an archived task
    Delete(IdArg),
    /// Turn grouping by period on or off (toggles when omitted)
    Group(GroupArgs),
}

#[derive(Args)]
pub struct GroupArgs {
    pub mode: Option<GroupMode>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupMode {
    On,
    Off,
}
