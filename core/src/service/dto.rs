use serde::Serialize;

use crate::model::task::Task;

/// Cardinalities over the unfiltered collection. Counts always reflect
/// global state, not whatever filter is currently active.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
}

/// The display projection of the task collection: what presentation layers
/// read. Recomputed from `(tasks, view)` on demand, never mutated directly.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub visible: Vec<Task>,
    /// Percentage of completed tasks, rounded; 0 for an empty collection.
    pub progress: u8,
    pub counts: StatusCounts,
}
