//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use playground_core::cli::ExitCode;
use std::io::{self, Write};
use tracing::info;

/// Writes the completion script for `shell` to `out`.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use clap_complete::Shell;
/// use playground_cli::commands::completions::generate_completions;
///
/// let mut script = Vec::new();
/// generate_completions(Shell::Bash, &mut Command::new("playground"), &mut script);
/// assert!(!script.is_empty());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, out);
}

/// Runs the completions command, printing the script to stdout.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    info!("Generating {shell} completions");
    generate_completions(shell, cmd, &mut io::stdout());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::CommandFactory;

    fn script(shell: Shell) -> String {
        let mut out = Vec::new();
        generate_completions(shell, &mut Cli::command(), &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_completions_mention_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let script = script(shell);
            assert!(script.contains("playground"), "{shell}");
            assert!(script.contains("import"), "{shell}");
        }
    }

    #[test]
    fn test_run() {
        let mut cmd = Command::new("test-cli");
        assert_eq!(run(Shell::Bash, &mut cmd).unwrap(), ExitCode::SUCCESS);
    }
}
