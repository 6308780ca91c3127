//! Script and interactive command loops

use super::commands::{Command, CommandOutput, execute};
use super::config::OutputFormat;
use crate::env;
use crate::task::TaskManager;
use anyhow::{Result, bail};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Script '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("Script '{path}' is not UTF-8 encoded")]
    NotUtf8 { path: PathBuf },

    #[error("IO error reading '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How a command loop behaves
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    /// Abort on the first line that fails to parse
    pub strict: bool,
    /// Prompt written before each line is read (interactive mode)
    pub prompt: Option<String>,
}

/// Outcome of a command loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub failed: usize,
    pub quit: bool,
}

impl RunOptions {
    pub fn script(format: OutputFormat, strict: bool) -> Self {
        Self {
            format,
            strict,
            prompt: None,
        }
    }

    pub fn interactive(format: OutputFormat) -> Self {
        Self {
            format,
            strict: false,
            prompt: Some(env::INTERACTIVE_PROMPT.to_string()),
        }
    }
}

/// Load a script file, mapping I/O failures to [`ScriptError`]
pub fn load_script<P: AsRef<Path>>(path: P) -> Result<String, ScriptError> {
    let path = path.as_ref().to_path_buf();
    debug!("Loading script: {:?}", path);

    fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScriptError::NotFound { path },
        std::io::ErrorKind::InvalidData => ScriptError::NotUtf8 { path },
        _ => ScriptError::IoError { path, source: e },
    })
}

/// Read commands line by line, execute them and write rendered output.
///
/// Blank lines and `#` comments are skipped. Parse failures are reported on
/// `output` and counted; with `strict` the loop stops with an error instead.
pub async fn run_commands<R, W>(
    manager: &TaskManager,
    input: R,
    output: &mut W,
    options: &RunOptions,
) -> Result<RunSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = RunSummary::default();
    let mut lines = input.lines();

    loop {
        if let Some(prompt) = &options.prompt {
            write!(output, "{prompt}")?;
            output.flush()?;
        }

        let Some(line) = lines.next() else {
            // EOF right after a prompt: end the prompt line
            if options.prompt.is_some() {
                writeln!(output)?;
            }
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let command = match trimmed.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                summary.failed += 1;
                if options.strict {
                    bail!("Line '{}': {}", trimmed, err);
                }
                warn!("Skipping line '{}': {}", trimmed, err);
                writeln!(output, "error: {err}")?;
                continue;
            }
        };

        debug!("Executing {:?}", command);
        let result = execute(manager, command).await;
        summary.executed += 1;
        writeln!(output, "{}", result.render(options.format)?)?;

        if result == CommandOutput::Quit {
            summary.quit = true;
            break;
        }
    }

    Ok(summary)
}
