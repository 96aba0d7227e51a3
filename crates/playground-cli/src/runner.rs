//! Command execution and runtime logic.
//!
//! Contains the command dispatch and logging initialization.

use anyhow::{Context as _, Result};
use playground_core::cli::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Commands;
use crate::commands::{self, common::Context};

/// Initializes logging infrastructure.
///
/// `--verbose` forces the debug level; otherwise `RUST_LOG` wins over the
/// configured `log_level`. Logs go to stderr, as JSON lines when `json` is
/// set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: bool, log_level: &str, json: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };
    installed.context("failed to initialize logging")
}

/// Executes the specified CLI command.
///
/// Routes commands to their respective handlers and returns an exit code.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub async fn execute_command(command: Commands, ctx: &Context) -> Result<ExitCode> {
    match command {
        Commands::Import {
            listing,
            project,
            source,
            root_name,
            max_file_size,
            mount,
        } => {
            commands::import::run(
                ctx,
                commands::import::ImportOptions {
                    listing,
                    project,
                    source,
                    root_name,
                    max_file_size,
                    mount,
                },
            )
            .await
        }
        Commands::Scan {
            dir,
            project,
            root_name,
            max_file_size,
            ignore_files,
            ignore_folders,
            mount,
        } => {
            commands::scan::run(
                ctx,
                commands::scan::ScanCommand {
                    dir,
                    project,
                    root_name,
                    max_file_size,
                    ignore_files,
                    ignore_folders,
                    mount,
                },
            )
            .await
        }
        Commands::Apply {
            project,
            mutations,
            mount,
        } => commands::apply::run(ctx, project, mutations, mount).await,
        Commands::Mount { project, dir } => commands::mount::run(ctx, project, dir).await,
        Commands::Show { project, file } => commands::show::run(ctx, project, file).await,
        Commands::Projects { action } => commands::projects::run(ctx, action).await,
        Commands::Config { action } => commands::config::run(ctx, action).await,
        Commands::Completions { shell } => {
            use crate::cli::Cli;
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

/// Maps a failed command to its exit code.
///
/// Failures carrying a [`playground_core::Error`] anywhere in their chain
/// use its classification; anything else is a generic error.
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<playground_core::Error>())
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}
