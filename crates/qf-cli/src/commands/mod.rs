//! CLI subcommand implementations.

pub mod flatten;
pub mod input;
pub mod inspect;
