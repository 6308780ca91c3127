//! # Taskboard
//!
//! An in-memory task tracker built on a small set of hand-written
//! collections. Tasks live in a growable array; every mutation is recorded
//! on an action history stack; newly created tasks wait in a circular
//! pending queue; and a binary search tree keyed by priority offers ordered
//! views over the live tasks.
//!
//! ## Architecture Overview
//!
//! - **[`collections`]**: `DynamicArray`, `Stack`, `CircularQueue` and `PriorityTree`
//! - **[`task`]**: Task types, the single-owner `TaskRegistry` and the shared `TaskManager`
//! - **[`cli`]**: Configuration discovery, the command language and the command loops
//! - **[`env`]**: Paths and defaults shared by the CLI
//!
//! ## Quick Start
//!
//! ```rust
//! use taskboard::{TaskPriority, TaskRegistry};
//!
//! let mut registry = TaskRegistry::default();
//! let task = registry.create_task("Write docs", "Crate overview", TaskPriority::High);
//!
//! assert_eq!(task.id, 1);
//! assert_eq!(registry.statistics().pending, 1);
//! assert!(registry.complete_task(task.id).is_some());
//! assert!(registry.is_empty());
//! ```

/// Hand-written container types backing the registry.
pub mod collections;

/// Task model, registry and shared manager.
pub mod task;

/// Command line interface support.
pub mod cli;

/// Environment constants and path utilities.
pub mod env;

pub use collections::{CircularQueue, CollectionError, DynamicArray, PriorityTree, Stack};

pub use task::{
    ActionKind, ActionRecord, QueueEntry, RegistryConfig, RegistryStatistics, Task, TaskHandle,
    TaskId, TaskManager, TaskPriority, TaskRegistry, TaskStatus, TaskUpdate, TreeTraversal,
};
