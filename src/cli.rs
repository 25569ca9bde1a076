//! CLI argument parsing for todo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "todo",
    about = "Git-friendly todo tracking with dependency links",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/todos/logs/todos.log"
)]
pub struct Cli {
    /// Repository root holding the .todos directory (default: enclosing git work tree, else current directory)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the store and register the git merge driver
    Init,

    /// Create a new todo and print its id
    New {
        /// Todo title
        title: String,
    },

    /// Close a todo
    Close {
        /// Todo ID or unique prefix
        id: String,
    },

    /// Make one todo depend on another
    Dep {
        /// Todo that waits
        child: String,

        /// Todo that must be closed first
        parent: String,
    },

    /// Set the summary of a todo
    Summary {
        /// Todo ID or unique prefix
        id: String,

        /// New summary text
        text: String,
    },

    /// Show a single todo from either partition
    Show {
        /// Todo ID or unique prefix
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List todos
    List {
        /// List closed todos instead of open ones
        #[arg(long)]
        closed: bool,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Show todos whose dependencies are all closed
    Ready {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Show todos still waiting on dependencies
    Blocked {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Three-way merge driver invoked by git (%O %A %B)
    Merge {
        /// Common ancestor version
        base: PathBuf,

        /// Local version, overwritten with the result
        ours: PathBuf,

        /// Remote version
        theirs: PathBuf,
    },
}
