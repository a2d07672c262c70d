//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tfvc-cache - local state caches for a TFVC client
///
/// Classifies paths against workspace mappings, plans workspace mapping
/// updates, and stages revision content in a temporary cache.
#[derive(Parser, Debug)]
#[command(name = "tfvc-cache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TFVC_CACHE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify local paths against a workspace's mapping roots
    Classify(ClassifyArgs),

    /// Plan the commands that turn one workspace into another
    Reconcile(ReconcileArgs),

    /// Stage files as revision content and report what the cache retains
    Content(ContentArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the classify command
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Workspace file (TOML) whose mapping local paths become roots
    #[arg(short, long)]
    pub workspace: Vec<PathBuf>,

    /// Path known to have no mapping root above it
    #[arg(long = "no-root")]
    pub no_root: Vec<PathBuf>,

    /// Paths to classify
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the reconcile command
#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Workspace file describing the current state
    pub current: PathBuf,

    /// Workspace file describing the desired state
    pub desired: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the content command
#[derive(Parser, Debug)]
pub struct ContentArgs {
    /// Revision to store the files under
    #[arg(short, long, default_value = "1")]
    pub revision: u64,

    /// Files to stage, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
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
        /// Configuration key (e.g., content.max_entries)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
