//! Action type definitions for CLI commands.

use clap::Subcommand;

/// Configuration actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

/// Stored project actions.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    /// List stored projects
    List,

    /// Delete a stored project
    Remove {
        /// Project id
        project: String,
    },
}
