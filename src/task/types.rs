use crate::collections::Prioritized;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sequential identifier assigned by the registry, starting at 1
pub type TaskId = u64;

/// One unit of work tracked by the registry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

/// Task priority levels, totally ordered `High > Medium > Low`
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

/// Task lifecycle state
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// Kind of mutation recorded in the action history
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Create,
    Delete,
    Update,
    Complete,
}

/// Immutable audit entry pushed on every successful mutation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ActionRecord {
    pub kind: ActionKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Replacement values for every mutable task field
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
}

/// Lightweight reference kept in the priority tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: TaskId,
    pub priority: TaskPriority,
}

/// Lightweight reference kept in the pending queue, captured at creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueTicket {
    pub id: TaskId,
    pub title: String,
}

/// A queue ticket resolved against the primary store
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueueEntry {
    /// The task is still live; carries its current state
    Active(Task),
    /// The task was deleted or completed after it was enqueued
    Stale { id: TaskId, title: String },
}

/// Counts by status plus the current size of each container
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStatistics {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub queue_size: usize,
    pub history_size: usize,
    pub tree_size: usize,
}

/// Failure to parse a textual priority or status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseTaskError {
    #[error("Unknown priority '{0}' (expected high, medium or low)")]
    UnknownPriority(String),
    #[error("Unknown status '{0}' (expected pending, in_progress or completed)")]
    UnknownStatus(String),
}

impl Task {
    pub fn new(id: TaskId, title: String, description: String, priority: TaskPriority) -> Self {
        Self {
            id,
            title,
            description,
            priority,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn handle(&self) -> TaskHandle {
        TaskHandle {
            id: self.id,
            priority: self.priority,
        }
    }

    /// Overwrite the mutable fields; `id` and `created_at` are untouched
    pub fn apply(&mut self, update: TaskUpdate) {
        self.title = update.title;
        self.description = update.description;
        self.priority = update.priority;
        self.status = update.status;
    }

    pub fn title_contains(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
    }
}

impl TaskPriority {
    /// Numeric rank used by the priority tree: High=3, Medium=2, Low=1
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::High => 3,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::High => "HIGH",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::Low => "LOW",
        }
    }
}

impl PartialOrd for TaskPriority {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TaskPriority {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Create => "CREATE",
            ActionKind::Delete => "DELETE",
            ActionKind::Update => "UPDATE",
            ActionKind::Complete => "COMPLETE",
        }
    }
}

impl ActionRecord {
    pub fn new(kind: ActionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

impl FromStr for TaskPriority {
    type Err = ParseTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "HIGH" | "H" => Ok(TaskPriority::High),
            "MEDIUM" | "MED" | "M" => Ok(TaskPriority::Medium),
            "LOW" | "L" => Ok(TaskPriority::Low),
            _ => Err(ParseTaskError::UnknownPriority(s.to_string())),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" | "INPROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" | "DONE" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskError::UnknownStatus(s.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] [{}] {}",
            self.id, self.priority, self.status, self.title
        )?;
        if !self.description.is_empty() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<8} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.message
        )
    }
}

impl fmt::Display for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueEntry::Active(task) => write!(f, "{task}"),
            QueueEntry::Stale { id, title } => write!(f, "#{id} {title} (stale: no longer tracked)"),
        }
    }
}

impl fmt::Display for RegistryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Pending: {} | In progress: {} | Completed: {} | Queued: {} | History: {} | Tree: {}",
            self.total,
            self.pending,
            self.in_progress,
            self.completed,
            self.queue_size,
            self.history_size,
            self.tree_size
        )
    }
}

impl Prioritized for Task {
    fn rank(&self) -> u8 {
        self.priority.rank()
    }

    fn key_id(&self) -> u64 {
        self.id
    }
}

impl Prioritized for TaskHandle {
    fn rank(&self) -> u8 {
        self.priority.rank()
    }

    fn key_id(&self) -> u64 {
        self.id
    }
}

impl QueueEntry {
    pub fn id(&self) -> TaskId {
        match self {
            QueueEntry::Active(task) => task.id,
            QueueEntry::Stale { id, .. } => *id,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, QueueEntry::Stale { .. })
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            QueueEntry::Active(task) => Some(task),
            QueueEntry::Stale { .. } => None,
        }
    }
}
