//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Degree-bounded trees with capacity-aware nearest-node search
#[derive(Parser, Debug)]
#[command(name = "degtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more: -d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Tree config file (default: ./.degtree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "DEGTREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured degree bound
    #[arg(short, long, global = true)]
    pub max_degree: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw the configured tree
    Show,

    /// Find the closest node with spare capacity
    Search {
        /// Key of the start node (default: configured start key, else root)
        #[arg(short, long)]
        from: Option<i64>,
    },

    /// Verify the degree bound and list eligible nodes
    Check,

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

    /// Show config paths
    Path,

    /// Print config template
    Template,
}
