//! Command-line surface, gated behind the `cli` feature.

pub mod commands;
pub mod params;

pub use commands::{Cli, Commands};
