use thiserror::Error;
use uuid::Uuid;

/// Failures produced by repository backends.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage i/o failed")]
    Io(#[from] std::io::Error),

    #[error("stored tasks could not be decoded")]
    Decode(#[from] serde_json::Error),

    #[error("record service request failed")]
    Transport(#[from] reqwest::Error),

    #[error("record service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("no task with id {0}")]
    NotFound(Uuid),
}

/// Failures surfaced by [`TaskListStore`](crate::service::task_list::TaskListStore)
/// operations. Each kind is distinguishable so the caller can decide between
/// re-prompting the user (validation) and notifying about a backend fault.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The task text trimmed to nothing; no repository call was made.
    #[error("task text must not be empty")]
    EmptyText,

    /// Reloading from the repository failed; the previous in-memory
    /// collection is retained.
    #[error("loading tasks failed")]
    Load(#[source] RepositoryError),

    /// A create/update/delete could not be persisted; the in-memory
    /// collection is unchanged.
    #[error("persisting task change failed")]
    Persistence(#[source] RepositoryError),
}
