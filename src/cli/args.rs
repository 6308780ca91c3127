//! Command line argument parsing
//!
//! Subcommands:
//! - `run`: Execute a command script, one command per line
//! - `interactive`: Read commands from stdin until `quit` or EOF
//! - `show-config`: Show configuration discovery information

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug)]
pub enum ExecutionMode {
    Script(ScriptConfig),
    Interactive(InteractiveConfig),
    ShowConfig { config_override: Option<PathBuf> },
}

#[derive(Debug)]
pub struct ScriptConfig {
    pub script: PathBuf,
    pub config_override: Option<PathBuf>,
    pub json: bool,
    pub strict: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct InteractiveConfig {
    pub config_override: Option<PathBuf>,
    pub json: bool,
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(name = "taskboard")]
#[command(author = "Taskboard Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "In-memory task tracker with history, pending queue and priority tree views")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a command script
    Run {
        /// Path to the script (one command per line, '#' comments)
        script: PathBuf,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Render results as JSON
        #[arg(long = "json")]
        json: bool,
        /// Stop at the first line that fails to parse
        #[arg(long = "strict")]
        strict: bool,
        /// Enable verbose logging
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Run in interactive mode
    Interactive {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Render results as JSON
        #[arg(long = "json")]
        json: bool,
        /// Enable verbose logging
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show configuration discovery information
    ShowConfig {
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
    },
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> Result<ExecutionMode, String> {
        match &self.command {
            Some(Commands::Run {
                script,
                config,
                json,
                strict,
                verbose,
            }) => Ok(ExecutionMode::Script(ScriptConfig {
                script: script.clone(),
                config_override: config.clone(),
                json: *json,
                strict: *strict,
                verbose: *verbose,
            })),
            Some(Commands::Interactive {
                config,
                json,
                verbose,
            }) => Ok(ExecutionMode::Interactive(InteractiveConfig {
                config_override: config.clone(),
                json: *json,
                verbose: *verbose,
            })),
            Some(Commands::ShowConfig { config }) => Ok(ExecutionMode::ShowConfig {
                config_override: config.clone(),
            }),
            None => Err(
                "No command specified. Use 'taskboard --help' to see available commands."
                    .to_string(),
            ),
        }
    }
}
