//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod harvest;
pub mod inspect;
pub mod organize;
pub mod status;
