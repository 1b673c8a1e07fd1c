//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gitviz - Visualize the object graph of a git repository
#[derive(Parser, Debug)]
#[command(name = "gitviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitviz was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Options shared by the graph-emitting commands.
#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Repository path (any directory inside the repository; defaults
    /// to the current directory)
    pub path: Option<PathBuf>,

    /// Don't show blob and tree objects
    #[arg(long)]
    pub no_blobs: bool,

    /// Don't show the staged index
    #[arg(long)]
    pub no_index: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pipe the DOT text through a Graphviz renderer
    #[arg(long)]
    pub render: bool,

    /// Renderer executable (default "dot", configurable)
    #[arg(long, value_name = "PROG", requires = "render")]
    pub renderer: Option<String>,

    /// Renderer output format, passed as -T (default "xdot", configurable)
    #[arg(long, value_name = "FMT", requires = "render")]
    pub render_format: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit the repository's object graph as Graphviz DOT
    #[command(
        name = "graph",
        long_about = "Emit the repository's object graph as Graphviz DOT.\n\n\
            Walks every object in the store - commits, trees, and blobs, \
            orphans included - and overlays branches, HEAD, and the staged \
            index. The DOT text goes to stdout unless --output or --render \
            redirect it.",
        after_help = "\
EXAMPLES:
    # Graph the current repository to stdout
    gitviz graph

    # Commits and refs only, no file contents
    gitviz graph --no-blobs

    # Render straight to an SVG file
    gitviz graph --render --render-format svg -o repo.svg"
    )]
    Graph {
        #[command(flatten)]
        args: EmitArgs,
    },

    /// Re-emit the graph whenever the repository changes
    #[command(
        name = "watch",
        long_about = "Watch a repository and re-emit its graph on every change.\n\n\
            Polls a fingerprint of the repository state (refs, HEAD, index, \
            object count) and runs a synchronization pass when it moves. The \
            vertex registry persists across passes, so each pass only adds \
            and retires what actually changed.",
        after_help = "\
EXAMPLES:
    # Rewrite repo.dot on every change, twice a second
    gitviz watch -o repo.dot

    # Slower polling for a large repository
    gitviz watch --interval-ms 1000 -o repo.dot"
    )]
    Watch {
        #[command(flatten)]
        args: EmitArgs,

        /// Poll interval in milliseconds (default 200, configurable)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },

    /// List git repositories directly under a directory
    #[command(
        name = "repos",
        long_about = "List the git repositories directly under a directory.\n\n\
            Detects normal repositories (a .git child) and bare ones (the \
            hooks/info/objects/refs layout). Only immediate children are \
            examined."
    )]
    Repos {
        /// Directory to scan
        root: PathBuf,

        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
