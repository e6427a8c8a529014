//! Quay flattening CLI library.
//!
//! This crate provides the CLI interface for quay version flattening.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, FlattenArgs, InspectArgs};
pub use config::Config;
