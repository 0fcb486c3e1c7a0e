use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "codebook")]
#[command(about = "Maintain a LIFE framework codebook from the command line")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: $CODEBOOK_HOME or ~/.codebook)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Where a record comes from: a YAML file, inline text, or stdin
#[derive(Args)]
pub struct RecordInput {
    /// Read the record as YAML from this file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Store this text as a raw record
    #[arg(short, long)]
    pub text: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List categories
    Categories,

    /// List items in a category
    List {
        /// Category key (e.g., rules)
        category: String,
    },

    /// Show one item as YAML
    Show {
        category: String,

        /// Item index (0-based)
        index: usize,
    },

    /// Add an item (YAML from --file, --text, or stdin)
    Add {
        category: String,

        #[command(flatten)]
        input: RecordInput,
    },

    /// Replace an item (YAML from --file, --text, or stdin)
    Edit {
        category: String,

        /// Item index (0-based)
        index: usize,

        #[command(flatten)]
        input: RecordInput,
    },

    /// Delete an item
    Delete {
        category: String,

        /// Item index (0-based)
        index: usize,
    },

    /// Search all items (case-insensitive)
    Search {
        /// Search term
        term: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the framework as YAML
    Export {
        /// Destination (relative paths resolve against the base directory)
        dest: Option<PathBuf>,
    },

    /// Replace the framework with an exported YAML file
    Import {
        /// Source YAML file with a `framework` root key
        source: PathBuf,
    },

    /// Show item counts and recommendations
    Analyze {
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show missing essential categories and weakly populated ones
    Gaps,

    /// Create a custom category
    AddCategory {
        /// Display name (key is derived: "My Cat" -> my_cat)
        name: String,

        /// Category description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Print the item template for a category
    Template { category: String },

    /// Suggest a category for a file and build a proposed item
    Classify {
        /// File to inspect (.yaml, .yml, .py, .txt, or anything else)
        file: PathBuf,

        /// Add the proposed item to the framework
        #[arg(long)]
        confirm: bool,

        /// Override the suggested category when confirming
        #[arg(short, long)]
        category: Option<String>,

        /// Print the proposal as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., meta.author)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., meta.author)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
