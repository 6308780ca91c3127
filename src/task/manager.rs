use crate::collections::DynamicArray;
use crate::task::registry::*;
use crate::task::types::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Shareable handle over a [`TaskRegistry`].
///
/// Every operation takes the registry lock for its full duration, so the
/// store, queue, tree and history are never observed half-updated. Mutations
/// (including dequeue and history pop) take the write lock, pure reads the
/// read lock. Returned values are owned copies.
#[derive(Clone, Debug)]
pub struct TaskManager {
    registry: Arc<RwLock<TaskRegistry>>,
}

impl TaskManager {
    pub fn new(config: RegistryConfig) -> Self {
        Self::from_registry(TaskRegistry::with_config(&config))
    }

    pub fn from_registry(registry: TaskRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    pub async fn create_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: TaskPriority,
    ) -> Task {
        let mut registry = self.registry.write().await;
        registry.create_task(title, description, priority)
    }

    pub async fn get_task(&self, id: TaskId) -> Option<Task> {
        let registry = self.registry.read().await;
        registry.find_by_id(id).cloned()
    }

    pub async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Option<Task> {
        let mut registry = self.registry.write().await;
        registry.update_task(id, update)
    }

    pub async fn delete_task(&self, id: TaskId) -> bool {
        let mut registry = self.registry.write().await;
        registry.delete_task(id)
    }

    pub async fn complete_task(&self, id: TaskId) -> Option<Task> {
        let mut registry = self.registry.write().await;
        registry.complete_task(id)
    }

    pub async fn search_by_title(&self, needle: &str) -> DynamicArray<Task> {
        let registry = self.registry.read().await;
        registry.find_by_title(needle)
    }

    pub async fn list_all(&self) -> DynamicArray<Task> {
        let registry = self.registry.read().await;
        registry.all_tasks()
    }

    pub async fn history(&self) -> DynamicArray<ActionRecord> {
        let registry = self.registry.read().await;
        registry.history()
    }

    pub async fn last_action(&self) -> Option<ActionRecord> {
        let registry = self.registry.read().await;
        registry.last_action().cloned()
    }

    pub async fn undo_last_action(&self) -> Option<ActionRecord> {
        let mut registry = self.registry.write().await;
        registry.undo_last_action()
    }

    pub async fn queue_list(&self) -> DynamicArray<QueueEntry> {
        let registry = self.registry.read().await;
        registry.queue_list()
    }

    pub async fn peek_queue(&self) -> Option<QueueEntry> {
        let registry = self.registry.read().await;
        registry.peek_queue()
    }

    pub async fn advance_queue(&self) -> Option<QueueEntry> {
        let mut registry = self.registry.write().await;
        registry.advance_queue()
    }

    pub async fn tree_view(&self, traversal: TreeTraversal) -> DynamicArray<Task> {
        let registry = self.registry.read().await;
        registry.tree_view(traversal)
    }

    pub async fn statistics(&self) -> RegistryStatistics {
        let registry = self.registry.read().await;
        let stats = registry.statistics();
        debug!("Computed statistics: {}", stats);
        stats
    }

    /// Run several operations under a single write lock
    pub async fn with_registry<R>(&self, f: impl FnOnce(&mut TaskRegistry) -> R) -> R {
        let mut registry = self.registry.write().await;
        f(&mut registry)
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
