use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::model::task::{NewTask, Task, TaskPatch};

/// CRUD boundary over the persisted task list, local or remote.
///
/// Implementations assign `id` and `created_at` on create and are
/// responsible for scoping records to the acting user; the store trusts
/// whatever collection the backend hands it.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError>;
    async fn create(&self, draft: NewTask) -> Result<Task, RepositoryError>;
    async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
