//! Command implementations for the playground CLI.
//!
//! Each command module executes one subcommand against the effective
//! [`common::Context`] and prints its result in the requested format.

pub mod apply;
pub mod common;
pub mod completions;
pub mod config;
pub mod import;
pub mod mount;
pub mod projects;
pub mod scan;
pub mod show;
