//! CLI arguments module
//!
//! Handles command-line argument parsing with clap.

pub mod args;

pub use args::{parse_args, CliArgs, StrategyType};
