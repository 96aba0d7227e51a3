//! CLI argument definitions and parsing.
//!
//! Defines the command-line interface structure using clap:
//! - `Cli` - Main CLI entry point
//! - `Commands` - Available subcommands

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::actions::{ConfigAction, ProjectAction};

/// Playground - import, edit and mount playground project trees.
///
/// Projects are stored as one JSON document each under the configured
/// projects directory and can be materialized into any directory.
#[derive(Parser, Debug)]
#[command(name = "playground")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text, pretty); defaults to the configured format
    #[arg(long = "format", global = true)]
    pub format: Option<String>,

    /// Configuration file (default: ~/.config/playground/config.toml)
    #[arg(long, global = true, env = "PLAYGROUND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding project documents; overrides `storage.projects_dir`
    #[arg(long, global = true, env = "PLAYGROUND_PROJECTS_DIR")]
    pub projects_dir: Option<PathBuf>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a repository tree listing as a new project.
    ///
    /// The listing is the JSON returned by a repository tree API: either a
    /// bare array of entries or an object with a `tree` array. Blob content
    /// is taken from the listing when present, otherwise from `--source`.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Listing with inline content
    /// playground import listing.json --project demo
    ///
    /// # Listing plus a local checkout for content
    /// playground import listing.json --source ./checkout --mount ./runtime
    /// ```
    Import {
        /// Path to the JSON listing
        listing: PathBuf,

        /// Project id (default: a generated id)
        #[arg(short, long)]
        project: Option<String>,

        /// Directory to read blob content from, by entry path
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Name of the root folder; overrides `import.root_name`
        #[arg(long)]
        root_name: Option<String>,

        /// Byte ceiling for file content; overrides `import.max_file_size`
        #[arg(long)]
        max_file_size: Option<u64>,

        /// Also materialize the project into this directory
        #[arg(short, long)]
        mount: Option<PathBuf>,
    },

    /// Scan a local template directory into a new project.
    ///
    /// # Examples
    ///
    /// ```bash
    /// playground scan ./templates/react --project react-starter
    /// ```
    Scan {
        /// Template directory
        dir: PathBuf,

        /// Project id (default: a generated id)
        #[arg(short, long)]
        project: Option<String>,

        /// Name of the root folder (default: the directory name)
        #[arg(long)]
        root_name: Option<String>,

        /// Byte ceiling for file content; overrides `scan.max_file_size`
        #[arg(long)]
        max_file_size: Option<u64>,

        /// Extra file names to ignore
        #[arg(long = "ignore-file", num_args = 1)]
        ignore_files: Vec<String>,

        /// Extra folder names to ignore
        #[arg(long = "ignore-folder", num_args = 1)]
        ignore_folders: Vec<String>,

        /// Also materialize the project into this directory
        #[arg(short, long)]
        mount: Option<PathBuf>,
    },

    /// Apply a list of tree mutations to a stored project.
    ///
    /// The mutations file holds a JSON array such as
    /// `[{"op": "rename_folder", "path": "src", "name": "lib"}]`.
    Apply {
        /// Project id
        project: String,

        /// Path to the JSON mutation list
        mutations: PathBuf,

        /// Keep this directory in sync while applying
        #[arg(short, long)]
        mount: Option<PathBuf>,
    },

    /// Materialize a stored project into a directory.
    Mount {
        /// Project id
        project: String,

        /// Target directory
        dir: PathBuf,
    },

    /// Show the tree of a stored project.
    Show {
        /// Project id
        project: String,

        /// Print the content of this file instead of the tree
        #[arg(long)]
        file: Option<String>,
    },

    /// Manage stored projects.
    Projects {
        /// Project action
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage CLI configuration.
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions.
    ///
    /// Generates completion scripts for various shells that can be
    /// sourced or saved to enable tab completion for this CLI.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}
