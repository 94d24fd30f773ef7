//! CLI argument definitions using clap derive

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// arcindex - cached archive index and entry resolver
///
/// Indexes which archive holds each entry once, caches the index, and
/// resolves entries by opening only the archive that owns them.
#[derive(Parser, Debug)]
#[command(name = "arcindex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ARCINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub index: IndexOptions,
}

/// Options shared by every command that needs an index
#[derive(Args, Debug, Clone, Default)]
pub struct IndexOptions {
    /// Archive to index, highest priority first (repeatable, before the command)
    #[arg(short = 'a', long = "archive")]
    pub archives: Vec<String>,

    /// Index cache file (overrides config)
    #[arg(long, global = true, env = "ARCINDEX_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Neither read nor write the index cache
    #[arg(long, global = true)]
    pub no_cache: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build or load the index and show a summary
    Index(IndexArgs),

    /// Print the bytes of a component by qualified name
    Resolve(ResolveArgs),

    /// Locate a resource entry
    Find(FindArgs),

    /// Manage the index cache file
    Cache(CacheArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the index command
#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Rescan archives even if the cache is valid
    #[arg(long)]
    pub rebuild: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Qualified component name (e.g. com.example.Main)
    pub name: String,

    /// Write the component under this directory instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the find command
#[derive(Parser, Debug)]
pub struct FindArgs {
    /// Entry path (e.g. META-INF/MANIFEST.MF)
    pub path: String,

    /// List every archive holding the entry
    #[arg(long)]
    pub all: bool,

    /// Print the entry's bytes instead of its address
    #[arg(long, conflicts_with = "all")]
    pub read: bool,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Cache action
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show whether the cache file exists and its size
    Status,

    /// Show the cache file path
    Path,

    /// Delete the cache file
    Clear,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.enabled)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for the index command
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Counts only, space separated
    Plain,
}
