//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

/// Inspect graph-database query responses: navigate, print and extract values
#[derive(Parser, Debug)]
#[command(name = "graphnav")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .graphnav.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the focused nodes as JSON
    Show {
        /// Response dump (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Navigation path, e.g. me/follows (`*` = first child)
        path: Option<String>,
    },

    /// Print the focused nodes as a tree
    Tree {
        /// Response dump (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Navigation path
        path: Option<String>,
        /// Property to show next to each node (repeatable, overrides config)
        #[arg(short = 'p', long = "prop")]
        props: Vec<String>,
    },

    /// Print a typed property value
    Get {
        /// Response dump (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Navigation path
        path: String,
        /// Property name
        prop: String,
        /// Value from every focused node instead of the first only
        #[arg(short, long)]
        all: bool,
        /// Expected value type
        #[arg(long = "as", value_enum, default_value_t = ScalarKind::String)]
        kind: ScalarKind,
    },

    /// Summarize the focus: size, identifiers, depth
    Info {
        /// Response dump (JSON)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Navigation path
        path: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

/// Scalar type selected with `get --as`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bytes,
    Int,
    Bool,
    Float,
    Geo,
    Date,
    Datetime,
    Password,
    Uid,
}
