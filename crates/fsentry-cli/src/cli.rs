use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fsentry",
    about = "fsentry: hierarchical object store on the local filesystem",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write tab-indented JSON sidecars
    #[arg(long, global = true)]
    pub pretty: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store root if it is missing
    Init,
    /// Delete the store root and everything in it
    Drop(DropArgs),
    /// List folders and entries of a nested path
    List(ListArgs),
    /// Folder objects
    Folder {
        #[command(subcommand)]
        action: FolderAction,
    },
    /// Entry (JSON record) objects
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },
    /// Binary objects
    Binary {
        #[command(subcommand)]
        action: BinaryAction,
    },
}

/// Location of an object below the root.
#[derive(Args, Clone, Debug, Default)]
pub struct Location {
    /// Nested folder path, e.g. `project_a/drafts`
    #[arg(long = "in", value_delimiter = '/')]
    pub parent: Vec<String>,
}

impl Location {
    pub fn segments(&self) -> Vec<&str> {
        self.parent.iter().map(String::as_str).collect()
    }
}

#[derive(Args)]
pub struct DropArgs {
    /// Required; the root is removed recursively
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Nested folder path; the root when omitted
    #[arg(value_delimiter = '/')]
    pub path: Vec<String>,
}

#[derive(Subcommand)]
pub enum FolderAction {
    Create {
        name: String,
        /// JSON payload
        #[arg(long)]
        data: Option<String>,
        #[command(flatten)]
        at: Location,
    },
    Get {
        name: String,
        #[command(flatten)]
        at: Location,
    },
    Move {
        old: String,
        new: String,
        #[command(flatten)]
        at: Location,
    },
    /// Rename without touching timestamps
    RenameKeepTime {
        old: String,
        new: String,
        #[command(flatten)]
        at: Location,
    },
    Update {
        name: String,
        /// JSON payload
        data: String,
        #[command(flatten)]
        at: Location,
    },
    Remove {
        name: String,
        #[command(flatten)]
        at: Location,
    },
    Duplicate {
        src: String,
        dst: String,
        #[command(flatten)]
        at: Location,
    },
}

#[derive(Subcommand)]
pub enum EntryAction {
    Create {
        name: String,
        /// JSON payload
        #[arg(long)]
        data: Option<String>,
        #[command(flatten)]
        at: Location,
    },
    Get {
        name: String,
        #[command(flatten)]
        at: Location,
    },
    Move {
        old: String,
        new: String,
        /// Keep the update timestamp as it is
        #[arg(long)]
        keep_time: bool,
        #[command(flatten)]
        at: Location,
    },
    Update {
        name: String,
        /// JSON payload
        data: String,
        #[command(flatten)]
        at: Location,
    },
    Remove {
        name: String,
        #[command(flatten)]
        at: Location,
    },
    Duplicate {
        src: String,
        dst: String,
        #[command(flatten)]
        at: Location,
    },
}

#[derive(Subcommand)]
pub enum BinaryAction {
    Create {
        name: String,
        /// Read content from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        at: Location,
    },
    Get {
        name: String,
        /// Write content to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        at: Location,
    },
    Move {
        old: String,
        new: String,
        #[command(flatten)]
        at: Location,
    },
    Update {
        name: String,
        /// Read content from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        at: Location,
    },
    Remove {
        name: String,
        #[command(flatten)]
        at: Location,
    },
    Duplicate {
        src: String,
        dst: String,
        #[command(flatten)]
        at: Location,
    },
}
