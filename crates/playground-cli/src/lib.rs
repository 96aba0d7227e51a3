//! Playground CLI library.
//!
//! This library provides the core functionality for the `playground` tool,
//! exposing modules for commands and formatters that can be tested.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod formatters;
pub mod runner;

pub use actions::{ConfigAction, ProjectAction};
pub use cli::{Cli, Commands};
