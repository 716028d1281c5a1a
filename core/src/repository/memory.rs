use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::repository::traits::TaskRepository;

/// Ephemeral backend holding the collection in process memory. Useful as a
/// test double and for sessions that never persist.
#[derive(Default)]
pub struct MemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an existing collection.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Task>> {
        // A poisoned lock only means a panic elsewhere mid-mutation; the
        // data is still a valid Vec, so keep serving it.
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        Ok(self.lock().clone())
    }

    async fn create(&self, draft: NewTask) -> Result<Task, RepositoryError> {
        let task = Task::new(draft);
        self.lock().push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), RepositoryError> {
        let mut tasks = self.lock();
        let pos = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        patch.apply(&mut tasks[pos]);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tasks = self.lock();
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == initial_len {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
