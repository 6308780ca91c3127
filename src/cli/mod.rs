//! CLI-specific functionality for the task board
//!
//! This module contains argument parsing, configuration discovery, the
//! line-oriented command language and the loops that drive it.

pub mod args;
pub mod commands;
pub mod config;
pub mod runner;

pub use args::{Args, ExecutionMode, InteractiveConfig, ScriptConfig};
pub use commands::{Command, CommandError, CommandOutput, execute};
pub use config::{ConfigDiscovery, OutputFormat, TaskboardConfig};
pub use runner::{RunOptions, RunSummary, ScriptError, load_script, run_commands};
