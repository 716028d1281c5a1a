pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use error::{RepositoryError, StoreError};
pub use model::task::{NewTask, Priority, Tag, Task, TaskPatch};
pub use model::view::{SortKey, StatusFilter, TagFilter, ViewConfig, ViewPatch};
pub use repository::{
    FileTaskRepository, MemoryTaskRepository, RemoteTaskRepository, TaskRepository,
};
pub use service::dto::{DerivedView, StatusCounts};
pub use service::task_list::{derive_view, sort_tasks, status_counts, TaskListStore};
