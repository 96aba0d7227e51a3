//! Playground CLI.
//!
//! Command-line interface for importing, scanning, editing and mounting
//! playground projects.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `import` - Build a project from a repository tree listing
//! - `scan` - Build a project from a local template directory
//! - `apply` - Replay tree mutations against a stored project
//! - `mount` - Materialize a stored project into a directory
//! - `show` - Print a project tree or one of its files
//! - `projects` - List and remove stored projects
//! - `config` - Manage the configuration file
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Import a listing and materialize it
//! playground import listing.json --project demo --mount ./runtime
//!
//! # Rename a folder
//! echo '[{"op": "rename_folder", "path": "src", "name": "lib"}]' > ops.json
//! playground apply demo ops.json --mount ./runtime
//! ```

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use playground_cli::cli::Cli;
use playground_cli::commands::common::Context;
use playground_cli::runner::{execute_command, exit_code_for, init_logging};
use playground_core::cli::{ExitCode, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = match Context::load(cli.config, cli.projects_dir, cli.format.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => fail(&e),
    };
    init_logging(
        cli.verbose,
        &ctx.config.general.log_level,
        ctx.format == OutputFormat::Json,
    )?;

    match execute_command(cli.command, &ctx).await {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(e) => fail(&e),
    }
}

fn fail(error: &anyhow::Error) -> ! {
    eprintln!("{} {error:#}", "error:".red().bold());
    let code: ExitCode = exit_code_for(error);
    std::process::exit(code.as_i32());
}
