//! Line-oriented command language over the task registry
//!
//! One command per line, keywords case-insensitive:
//!
//! ```text
//! create <priority> <title> [| <description>]
//! update <id> <priority> <status> <title> [| <description>]
//! get <id> | delete <id> | complete <id>
//! search <substring> | list
//! history | last | undo
//! queue | peek | advance
//! tree [inorder|preorder|postorder|all]
//! stats | help | quit
//! ```

use super::config::OutputFormat;
use crate::collections::DynamicArray;
use crate::task::{
    ActionRecord, ParseTaskError, QueueEntry, RegistryStatistics, Task, TaskId, TaskManager,
    TaskPriority, TaskStatus, TaskUpdate, TreeTraversal,
};
use anyhow::Result;
use serde::Serialize;
use std::str::FromStr;

pub const HELP_TEXT: &str = "\
Commands:
  create <priority> <title> [| <description>]   add a pending task
  get <id>                                      show one task
  update <id> <priority> <status> <title> [| <description>]
  delete <id>                                   remove a task
  complete <id>                                 complete and remove a task
  search <substring>                            case-insensitive title search
  list                                          all tasks in creation order
  history | last | undo                         action history (undo only pops)
  queue | peek | advance                        pending queue in arrival order
  tree [inorder|preorder|postorder|all]         priority tree views
  stats                                         summary counts
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create {
        priority: TaskPriority,
        title: String,
        description: String,
    },
    Get(TaskId),
    Update {
        id: TaskId,
        update: TaskUpdate,
    },
    Delete(TaskId),
    Complete(TaskId),
    Search(String),
    List,
    History,
    Last,
    Undo,
    Queue,
    Peek,
    Advance,
    Tree(TreeTraversal),
    Stats,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("'{command}' is missing its {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("Invalid task id '{0}'")]
    InvalidId(String),
    #[error("Unknown traversal '{0}' (expected inorder, preorder, postorder or all)")]
    UnknownTraversal(String),
    #[error(transparent)]
    Parse(#[from] ParseTaskError),
}

/// Result of executing one command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CommandOutput {
    Task(Task),
    Tasks(DynamicArray<Task>),
    Deleted { id: TaskId, deleted: bool },
    Actions(DynamicArray<ActionRecord>),
    Action(ActionRecord),
    QueueEntries(DynamicArray<QueueEntry>),
    QueueEntry(QueueEntry),
    Statistics(RegistryStatistics),
    NotFound { id: TaskId },
    Empty { what: &'static str },
    Help(&'static str),
    Quit,
}

fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Some((&input[..end], &input[end..]))
}

fn require_token<'a>(
    input: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<(&'a str, &'a str), CommandError> {
    next_token(input).ok_or(CommandError::MissingArgument { command, argument })
}

fn parse_id<'a>(
    input: &'a str,
    command: &'static str,
) -> Result<(TaskId, &'a str), CommandError> {
    let (token, rest) = require_token(input, command, "task id")?;
    let id = token
        .trim_start_matches('#')
        .parse::<TaskId>()
        .map_err(|_| CommandError::InvalidId(token.to_string()))?;
    Ok((id, rest))
}

fn title_and_description(
    input: &str,
    command: &'static str,
) -> Result<(String, String), CommandError> {
    let (title, description) = match input.split_once('|') {
        Some((title, description)) => (title.trim(), description.trim()),
        None => (input.trim(), ""),
    };
    if title.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "title",
        });
    }
    Ok((title.to_string(), description.to_string()))
}

impl FromStr for TreeTraversal {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "inorder" | "in" => Ok(TreeTraversal::InOrder),
            "preorder" | "pre" => Ok(TreeTraversal::PreOrder),
            "postorder" | "post" => Ok(TreeTraversal::PostOrder),
            "all" => Ok(TreeTraversal::All),
            _ => Err(CommandError::UnknownTraversal(s.to_string())),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (keyword, rest) = next_token(line).ok_or(CommandError::Empty)?;

        match keyword.to_ascii_lowercase().as_str() {
            "create" | "add" => {
                let (priority, rest) = require_token(rest, "create", "priority")?;
                let (title, description) = title_and_description(rest, "create")?;
                Ok(Command::Create {
                    priority: priority.parse()?,
                    title,
                    description,
                })
            }
            "get" | "show" => Ok(Command::Get(parse_id(rest, "get")?.0)),
            "update" => {
                let (id, rest) = parse_id(rest, "update")?;
                let (priority, rest) = require_token(rest, "update", "priority")?;
                let (status, rest) = require_token(rest, "update", "status")?;
                let (title, description) = title_and_description(rest, "update")?;
                Ok(Command::Update {
                    id,
                    update: TaskUpdate {
                        title,
                        description,
                        priority: priority.parse()?,
                        status: status.parse::<TaskStatus>()?,
                    },
                })
            }
            "delete" | "rm" => Ok(Command::Delete(parse_id(rest, "delete")?.0)),
            "complete" | "done" => Ok(Command::Complete(parse_id(rest, "complete")?.0)),
            "search" | "find" => {
                let needle = rest.trim();
                if needle.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "search",
                        argument: "substring",
                    });
                }
                Ok(Command::Search(needle.to_string()))
            }
            "list" | "ls" => Ok(Command::List),
            "history" => Ok(Command::History),
            "last" => Ok(Command::Last),
            "undo" => Ok(Command::Undo),
            "queue" => Ok(Command::Queue),
            "peek" => Ok(Command::Peek),
            "advance" | "next" => Ok(Command::Advance),
            "tree" => match next_token(rest) {
                Some((traversal, _)) => Ok(Command::Tree(traversal.parse()?)),
                None => Ok(Command::Tree(TreeTraversal::default())),
            },
            "stats" | "statistics" => Ok(Command::Stats),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

/// Execute a command against the shared registry
pub async fn execute(manager: &TaskManager, command: Command) -> CommandOutput {
    match command {
        Command::Create {
            priority,
            title,
            description,
        } => CommandOutput::Task(manager.create_task(title, description, priority).await),
        Command::Get(id) => found(id, manager.get_task(id).await),
        Command::Update { id, update } => found(id, manager.update_task(id, update).await),
        Command::Delete(id) => CommandOutput::Deleted {
            id,
            deleted: manager.delete_task(id).await,
        },
        Command::Complete(id) => found(id, manager.complete_task(id).await),
        Command::Search(needle) => CommandOutput::Tasks(manager.search_by_title(&needle).await),
        Command::List => CommandOutput::Tasks(manager.list_all().await),
        Command::History => CommandOutput::Actions(manager.history().await),
        Command::Last => match manager.last_action().await {
            Some(record) => CommandOutput::Action(record),
            None => CommandOutput::Empty { what: "history" },
        },
        Command::Undo => match manager.undo_last_action().await {
            Some(record) => CommandOutput::Action(record),
            None => CommandOutput::Empty { what: "history" },
        },
        Command::Queue => CommandOutput::QueueEntries(manager.queue_list().await),
        Command::Peek => match manager.peek_queue().await {
            Some(entry) => CommandOutput::QueueEntry(entry),
            None => CommandOutput::Empty { what: "queue" },
        },
        Command::Advance => match manager.advance_queue().await {
            Some(entry) => CommandOutput::QueueEntry(entry),
            None => CommandOutput::Empty { what: "queue" },
        },
        Command::Tree(traversal) => CommandOutput::Tasks(manager.tree_view(traversal).await),
        Command::Stats => CommandOutput::Statistics(manager.statistics().await),
        Command::Help => CommandOutput::Help(HELP_TEXT),
        Command::Quit => CommandOutput::Quit,
    }
}

fn found(id: TaskId, task: Option<Task>) -> CommandOutput {
    match task {
        Some(task) => CommandOutput::Task(task),
        None => CommandOutput::NotFound { id },
    }
}

impl CommandOutput {
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        match self {
            CommandOutput::Task(task) => task.to_string(),
            CommandOutput::Tasks(tasks) => render_lines(tasks, "(no tasks)"),
            CommandOutput::Deleted { id, deleted: true } => format!("Deleted task #{id}"),
            CommandOutput::Deleted { id, deleted: false } => format!("Task #{id} not found"),
            CommandOutput::Actions(records) => render_lines(records, "(history is empty)"),
            CommandOutput::Action(record) => record.to_string(),
            CommandOutput::QueueEntries(entries) => render_lines(entries, "(queue is empty)"),
            CommandOutput::QueueEntry(entry) => entry.to_string(),
            CommandOutput::Statistics(stats) => stats.to_string(),
            CommandOutput::NotFound { id } => format!("Task #{id} not found"),
            CommandOutput::Empty { what } => format!("({what} is empty)"),
            CommandOutput::Help(text) => text.to_string(),
            CommandOutput::Quit => "Bye".to_string(),
        }
    }
}

fn render_lines<T: std::fmt::Display>(items: &DynamicArray<T>, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
