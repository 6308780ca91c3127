//! File and directory names used by configuration discovery.
//!
//! Centralized here so the discovery hierarchy and its tests agree on paths.

use std::path::{Path, PathBuf};

/// Hidden application directory (like .git)
pub const TASKBOARD_DIR_NAME: &str = ".taskboard";

/// Configuration file name inside [`TASKBOARD_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Stand-alone configuration file name in the working directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "taskboard.toml";

/// System-wide configuration location (unix)
pub const SYSTEM_CONFIG_PATH: &str = "/etc/taskboard/config.toml";

/// Default tracing filter when neither RUST_LOG nor config provide one
pub const DEFAULT_LOG_FILTER: &str = "taskboard=info";

/// Prompt shown in interactive mode
pub const INTERACTIVE_PROMPT: &str = "taskboard> ";

/// Build the .taskboard directory path from a root
pub fn taskboard_dir_path(root: &Path) -> PathBuf {
    root.join(TASKBOARD_DIR_NAME)
}

/// Build config file path in user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    taskboard_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Build the stand-alone config file path in the current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}

/// Build the hidden-directory config file path in the current directory
pub fn local_dir_config_file_path(current_dir: &Path) -> PathBuf {
    taskboard_dir_path(current_dir).join(CONFIG_FILE_NAME)
}
