use crate::collections::{CircularQueue, DEFAULT_INITIAL_CAPACITY, DynamicArray, PriorityTree, Stack};
use crate::task::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Owner of the four containers and the only place their cross-structure
/// invariants are enforced.
///
/// - `tasks` is the canonical, insertion-ordered store.
/// - `pending` receives a ticket once per task at creation; it is never
///   purged, so tickets for removed tasks surface as [`QueueEntry::Stale`].
/// - `priority_index` holds one handle per live task, keyed by its current
///   priority.
/// - `history` receives one record per successful mutation.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: DynamicArray<Task>,
    history: Stack<ActionRecord>,
    pending: CircularQueue<QueueTicket>,
    priority_index: PriorityTree<TaskHandle>,
    next_id: TaskId,
}

/// Registry tuning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Initial backing capacity of the store, history and pending queue
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Tree view selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TreeTraversal {
    #[default]
    InOrder,
    PreOrder,
    PostOrder,
    All,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    pub fn with_config(config: &RegistryConfig) -> Self {
        Self {
            tasks: DynamicArray::with_capacity(config.initial_capacity),
            history: Stack::with_capacity(config.initial_capacity),
            pending: CircularQueue::with_capacity(config.initial_capacity),
            priority_index: PriorityTree::new(),
            next_id: 1,
        }
    }

    // ---- mutations ----

    /// Create a pending task and register it in every structure
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Task {
        let id = self.next_id;
        self.next_id += 1;

        let task = Task::new(id, title.into(), description.into(), priority);

        self.tasks.push(task.clone());
        self.pending.enqueue(QueueTicket {
            id,
            title: task.title.clone(),
        });
        self.priority_index.insert(task.handle());
        self.record(ActionKind::Create, format!("Task created: {}", task.title));

        info!("Created task {} ({}) with priority {}", id, task.title, priority);
        task
    }

    /// Remove a task from the store and the tree; `false` when the id is unknown
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        match self.detach(id) {
            Some(task) => {
                self.record(ActionKind::Delete, format!("Task deleted: {}", task.title));
                info!("Deleted task {}", id);
                true
            }
            None => {
                debug!("Delete requested for unknown task {}", id);
                false
            }
        }
    }

    /// Overwrite every mutable field; re-keys the tree entry when the priority changes
    pub fn update_task(&mut self, id: TaskId, update: TaskUpdate) -> Option<Task> {
        let index = self.index_of(id)?;
        let task = self.tasks.get_mut(index).ok()?;

        let previous = task.handle();
        task.apply(update);
        let updated = task.clone();

        if previous.priority != updated.priority {
            self.priority_index.delete_by_identity(&previous);
            self.priority_index.insert(updated.handle());
            debug!(
                "Re-keyed task {} in priority tree: {} -> {}",
                id, previous.priority, updated.priority
            );
        }

        self.record(ActionKind::Update, format!("Task updated: {}", updated.title));
        info!("Updated task {}", id);
        Some(updated)
    }

    /// Mark a task completed, then remove it from the store and the tree.
    ///
    /// Pushes two history records (completion, then automatic removal) and
    /// returns the task as it was at completion.
    pub fn complete_task(&mut self, id: TaskId) -> Option<Task> {
        let index = self.index_of(id)?;
        let task = self.tasks.get_mut(index).ok()?;
        task.status = TaskStatus::Completed;
        let title = task.title.clone();

        self.record(ActionKind::Complete, format!("Task completed: {title}"));

        let completed = self.detach(id)?;
        self.record(
            ActionKind::Delete,
            format!("Completed task removed automatically: {title}"),
        );

        info!("Completed task {} and removed it from the store", id);
        Some(completed)
    }

    /// Dequeue the next ticket, resolved against the store
    pub fn advance_queue(&mut self) -> Option<QueueEntry> {
        let ticket = self.pending.dequeue()?;
        let entry = Self::resolve_ticket(&ticket, self.find_by_id(ticket.id));
        if entry.is_stale() {
            debug!("Dequeued stale ticket for task {}", ticket.id);
        }
        Some(entry)
    }

    /// Pop the newest history record. The underlying task mutation is not reverted.
    pub fn undo_last_action(&mut self) -> Option<ActionRecord> {
        let record = self.history.pop();
        if let Some(record) = &record {
            debug!("Popped history record: {} {}", record.kind, record.message);
        }
        record
    }

    // ---- reads ----

    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.index_of(id).and_then(|index| self.tasks.get(index).ok())
    }

    /// Case-insensitive title search in store order
    pub fn find_by_title(&self, needle: &str) -> DynamicArray<Task> {
        let needle = needle.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| task.title_contains(&needle))
            .cloned()
            .collect()
    }

    pub fn all_tasks(&self) -> DynamicArray<Task> {
        self.tasks.snapshot()
    }

    /// History oldest first
    pub fn history(&self) -> DynamicArray<ActionRecord> {
        self.history.snapshot()
    }

    pub fn last_action(&self) -> Option<&ActionRecord> {
        self.history.peek()
    }

    /// Pending queue in FIFO order, stale tickets included
    pub fn queue_list(&self) -> DynamicArray<QueueEntry> {
        let positions = self.store_positions();
        self.pending
            .iter()
            .map(|ticket| Self::resolve_ticket(ticket, self.task_at(&positions, ticket.id)))
            .collect()
    }

    pub fn peek_queue(&self) -> Option<QueueEntry> {
        self.pending
            .front()
            .map(|ticket| Self::resolve_ticket(ticket, self.find_by_id(ticket.id)))
    }

    pub fn tree_in_order(&self) -> DynamicArray<Task> {
        self.resolve_handles(self.priority_index.traverse_in_order())
    }

    pub fn tree_pre_order(&self) -> DynamicArray<Task> {
        self.resolve_handles(self.priority_index.traverse_pre_order())
    }

    pub fn tree_post_order(&self) -> DynamicArray<Task> {
        self.resolve_handles(self.priority_index.traverse_post_order())
    }

    pub fn tree_all(&self) -> DynamicArray<Task> {
        self.resolve_handles(self.priority_index.all())
    }

    pub fn tree_view(&self, traversal: TreeTraversal) -> DynamicArray<Task> {
        match traversal {
            TreeTraversal::InOrder => self.tree_in_order(),
            TreeTraversal::PreOrder => self.tree_pre_order(),
            TreeTraversal::PostOrder => self.tree_post_order(),
            TreeTraversal::All => self.tree_all(),
        }
    }

    pub fn statistics(&self) -> RegistryStatistics {
        let mut stats = RegistryStatistics {
            total: self.tasks.len(),
            queue_size: self.pending.len(),
            history_size: self.history.len(),
            tree_size: self.priority_index.len(),
            ..Default::default()
        };

        for task in self.tasks.iter() {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }

        stats
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ---- internals ----

    fn index_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.position(|task| task.id == id)
    }

    /// Remove from store and tree without recording history
    fn detach(&mut self, id: TaskId) -> Option<Task> {
        let index = self.index_of(id)?;
        let task = self.tasks.remove(index).ok()?;
        self.priority_index.delete_by_identity(&task);
        Some(task)
    }

    fn record(&mut self, kind: ActionKind, message: String) {
        self.history.push(ActionRecord::new(kind, message));
    }

    /// Id to store position, built once per bulk read
    fn store_positions(&self) -> HashMap<TaskId, usize> {
        self.tasks
            .iter()
            .enumerate()
            .map(|(index, task)| (task.id, index))
            .collect()
    }

    fn task_at(&self, positions: &HashMap<TaskId, usize>, id: TaskId) -> Option<&Task> {
        positions
            .get(&id)
            .and_then(|index| self.tasks.get(*index).ok())
    }

    fn resolve_ticket(ticket: &QueueTicket, task: Option<&Task>) -> QueueEntry {
        match task {
            Some(task) => QueueEntry::Active(task.clone()),
            None => QueueEntry::Stale {
                id: ticket.id,
                title: ticket.title.clone(),
            },
        }
    }

    fn resolve_handles(&self, handles: DynamicArray<TaskHandle>) -> DynamicArray<Task> {
        let positions = self.store_positions();
        handles
            .into_iter()
            .filter_map(|handle| self.task_at(&positions, handle.id).cloned())
            .collect()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(tasks: DynamicArray<Task>) -> Vec<String> {
        tasks.into_iter().map(|t| t.title).collect()
    }

    fn update(title: &str, priority: TaskPriority, status: TaskStatus) -> TaskUpdate {
        TaskUpdate {
            title: title.to_string(),
            description: "d".to_string(),
            priority,
            status,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut registry = TaskRegistry::new();
        let a = registry.create_task("A", "d", TaskPriority::High);
        let b = registry.create_task("B", "d", TaskPriority::Low);

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(a.status, TaskStatus::Pending);

        let stats = registry.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.queue_size, 2);
        assert_eq!(stats.tree_size, 2);
        assert_eq!(stats.history_size, 2);
        assert_eq!(registry.last_action().unwrap().kind, ActionKind::Create);
    }

    #[test]
    fn test_tree_in_order_is_low_first() {
        let mut registry = TaskRegistry::new();
        registry.create_task("A", "d", TaskPriority::High);
        registry.create_task("B", "d", TaskPriority::Low);

        assert_eq!(titles(registry.tree_in_order()), vec!["B", "A"]);
        assert_eq!(titles(registry.tree_all()), vec!["B", "A"]);
    }

    #[test]
    fn test_delete_missing_pushes_nothing() {
        let mut registry = TaskRegistry::new();
        registry.create_task("A", "d", TaskPriority::High);
        let before = registry.history().len();

        assert!(!registry.delete_task(999));
        assert_eq!(registry.history().len(), before);
    }

    #[test]
    fn test_delete_removes_from_store_and_tree_only() {
        let mut registry = TaskRegistry::new();
        let a = registry.create_task("A", "d", TaskPriority::Medium);
        registry.create_task("B", "d", TaskPriority::Medium);

        assert!(registry.delete_task(a.id));
        assert!(registry.find_by_id(a.id).is_none());
        assert_eq!(titles(registry.tree_in_order()), vec!["B"]);

        let stats = registry.statistics();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.tree_size, 1);
        assert_eq!(stats.queue_size, 2);
        assert_eq!(registry.last_action().unwrap().kind, ActionKind::Delete);
    }

    #[test]
    fn test_complete_pushes_two_records_and_removes() {
        let mut registry = TaskRegistry::new();
        let task = registry.create_task("Write report", "d", TaskPriority::High);
        let before = registry.history().len();

        let completed = registry.complete_task(task.id).unwrap();
        assert_eq!(completed.status, TaskStatus::Completed);
        assert_eq!(completed.id, task.id);
        assert!(registry.find_by_id(task.id).is_none());
        assert!(registry.priority_index.is_empty());

        let history = registry.history();
        assert_eq!(history.len(), before + 2);
        assert_eq!(history.get(before).unwrap().kind, ActionKind::Complete);
        assert_eq!(history.get(before + 1).unwrap().kind, ActionKind::Delete);
        assert!(registry.complete_task(task.id).is_none());
    }

    #[test]
    fn test_update_changes_fields_and_rekeys() {
        let mut registry = TaskRegistry::new();
        let a = registry.create_task("A", "d", TaskPriority::Medium);
        let b = registry.create_task("B", "d", TaskPriority::High);
        registry.create_task("C", "d", TaskPriority::Medium);

        assert_eq!(titles(registry.tree_in_order()), vec!["A", "C", "B"]);

        let updated = registry
            .update_task(a.id, update("A2", TaskPriority::High, TaskStatus::InProgress))
            .unwrap();
        assert_eq!(updated.title, "A2");
        assert_eq!(updated.created_at, a.created_at);

        // Same rank as B, smaller id: sorts before B.
        assert_eq!(titles(registry.tree_in_order()), vec!["C", "A2", "B"]);
        assert_eq!(titles(registry.all_tasks()), vec!["A2", "B", "C"]);
        assert_eq!(registry.statistics().tree_size, 3);
        assert!(registry.priority_index.contains_id(b.id));
    }

    #[test]
    fn test_update_same_priority_keeps_tree_shape() {
        let mut registry = TaskRegistry::new();
        let a = registry.create_task("A", "d", TaskPriority::Low);
        registry.create_task("B", "d", TaskPriority::Low);
        let before: Vec<_> = registry.tree_pre_order().into_iter().map(|t| t.id).collect();

        registry
            .update_task(a.id, update("renamed", TaskPriority::Low, TaskStatus::Pending))
            .unwrap();

        let after = registry.tree_pre_order();
        assert_eq!(after.iter().map(|t| t.id).collect::<Vec<_>>(), before);
        assert_eq!(after.first().unwrap().title, "renamed");
    }

    #[test]
    fn test_update_missing_returns_none() {
        let mut registry = TaskRegistry::new();
        let result = registry.update_task(7, update("x", TaskPriority::Low, TaskStatus::Pending));
        assert!(result.is_none());
        assert!(registry.history().is_empty());
    }

    #[test]
    fn test_queue_surfaces_stale_entries() {
        let mut registry = TaskRegistry::new();
        assert!(registry.advance_queue().is_none());
        assert!(registry.peek_queue().is_none());

        let a = registry.create_task("A", "d", TaskPriority::Low);
        let b = registry.create_task("B", "d", TaskPriority::Low);
        registry.complete_task(a.id);

        let listed = registry.queue_list();
        assert_eq!(listed.len(), 2);
        assert!(listed.get(0).unwrap().is_stale());

        let first = registry.advance_queue().unwrap();
        assert_eq!(
            first,
            QueueEntry::Stale {
                id: a.id,
                title: "A".to_string()
            }
        );
        assert_eq!(registry.peek_queue().unwrap().id(), b.id);

        let second = registry.advance_queue().unwrap();
        assert_eq!(second.task().unwrap().title, "B");
        assert!(registry.advance_queue().is_none());
        // Dequeuing leaves the store untouched.
        assert!(registry.find_by_id(b.id).is_some());
    }

    #[test]
    fn test_queue_reflects_status_edits_without_reordering() {
        let mut registry = TaskRegistry::new();
        let a = registry.create_task("A", "d", TaskPriority::Low);
        registry.create_task("B", "d", TaskPriority::High);
        registry
            .update_task(a.id, update("A", TaskPriority::Low, TaskStatus::InProgress))
            .unwrap();

        let front = registry.peek_queue().unwrap();
        assert_eq!(front.task().unwrap().status, TaskStatus::InProgress);
        assert_eq!(registry.queue_list().len(), 2);
    }

    #[test]
    fn test_undo_only_pops_history() {
        let mut registry = TaskRegistry::new();
        let task = registry.create_task("A", "d", TaskPriority::Low);

        let popped = registry.undo_last_action().unwrap();
        assert_eq!(popped.kind, ActionKind::Create);
        assert!(registry.history().is_empty());
        assert!(registry.find_by_id(task.id).is_some());
        assert!(registry.undo_last_action().is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_in_store_order() {
        let mut registry = TaskRegistry::new();
        registry.create_task("Fix Login", "d", TaskPriority::Low);
        registry.create_task("Deploy", "d", TaskPriority::High);
        registry.create_task("login audit", "d", TaskPriority::Medium);

        assert_eq!(
            titles(registry.find_by_title("LOGIN")),
            vec!["Fix Login", "login audit"]
        );
        assert!(registry.find_by_title("nothing").is_empty());
    }

    #[test]
    fn test_statistics_counts_statuses() {
        let mut registry = TaskRegistry::with_config(&RegistryConfig {
            initial_capacity: 1,
        });
        let a = registry.create_task("A", "d", TaskPriority::Low);
        registry.create_task("B", "d", TaskPriority::Low);
        let c = registry.create_task("C", "d", TaskPriority::Low);
        registry.update_task(a.id, update("A", TaskPriority::Low, TaskStatus::InProgress));
        registry.update_task(c.id, update("C", TaskPriority::Low, TaskStatus::Completed));

        let stats = registry.statistics();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.history_size, 5);
        assert_eq!(
            stats.to_string(),
            "Total: 3 | Pending: 1 | In progress: 1 | Completed: 1 | Queued: 3 | History: 5 | Tree: 3"
        );
    }

    #[test]
    fn test_complete_newest_of_many_same_priority_tasks() {
        let mut registry = TaskRegistry::new();
        for i in 0..20_000 {
            registry.create_task(format!("t{i}"), "", TaskPriority::Low);
        }

        let completed = registry.complete_task(20_000).unwrap();
        assert_eq!(completed.title, "t19999");
        assert!(registry.delete_task(1));

        assert_eq!(registry.len(), 19_998);
        assert_eq!(registry.statistics().tree_size, 19_998);

        let in_order = registry.tree_in_order();
        assert_eq!(in_order.len(), 19_998);
        assert_eq!(in_order.first().map(|task| task.id), Some(2));
        assert_eq!(in_order.last().map(|task| task.id), Some(19_999));

        let queued = registry.queue_list();
        assert_eq!(queued.len(), 20_000);
        assert!(queued.first().unwrap().is_stale());
        assert!(queued.last().unwrap().is_stale());
    }
}
