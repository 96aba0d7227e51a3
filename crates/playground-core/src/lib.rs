//! Core types, errors and configuration for the playground project tree.
//!
//! This crate provides the foundation shared by every other crate in the
//! workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong identifier types (`ProjectId`, `FileId`, `Revision`)
//! - Error hierarchy with contextual information
//! - TOML configuration with validation
//! - CLI primitive types

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod types;

pub mod cli;

pub use config::{
    DEFAULT_MAX_FILE_SIZE, GeneralConfig, ImportConfig, PlaygroundConfig,
    PlaygroundConfigBuilder, ScanConfig, StorageConfig,
};
pub use error::{Error, Result};
pub use types::{FileId, ProjectId, Revision};
