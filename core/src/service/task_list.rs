use std::cmp::Reverse;

use chrono::NaiveDate;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::view::{SortKey, ViewConfig, ViewPatch};
use crate::repository::traits::TaskRepository;
use crate::service::dto::{DerivedView, StatusCounts};

/// Owns the authoritative in-memory task collection and the current view
/// parameters. All mutations go through the repository first; the local
/// collection changes only after the backend confirms the write, so a
/// failed call never leaves a speculative task behind.
pub struct TaskListStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    view: ViewConfig,
}

impl<R: TaskRepository> TaskListStore<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            tasks: Vec::new(),
            view: ViewConfig::default(),
        }
    }

    /// Replace the collection wholesale from the repository. On failure the
    /// previous collection is retained and the error is surfaced for user
    /// notification.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        let tasks = self.repo.list().await.map_err(StoreError::Load)?;
        debug!(count = tasks.len(), "task collection reloaded");
        self.tasks = tasks;
        Ok(())
    }

    /// Validate, persist, then append. Returns the created task as the
    /// repository assigned it.
    pub async fn add_task(&mut self, draft: NewTask) -> Result<Task, StoreError> {
        let text = draft.text.trim().to_string();
        if text.is_empty() {
            return Err(StoreError::EmptyText);
        }
        let draft = NewTask { text, ..draft };

        let created = self
            .repo
            .create(draft)
            .await
            .map_err(StoreError::Persistence)?;
        debug!(id = %created.id, "task added");
        self.tasks.push(created.clone());
        Ok(created)
    }

    /// Flip the completion flag. An unknown id is a tolerated race with a
    /// concurrent removal and is silently ignored.
    pub async fn toggle_done(&mut self, id: Uuid) -> Result<(), StoreError> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            warn!(%id, "toggle for unknown task ignored");
            return Ok(());
        };
        let done = !self.tasks[pos].done;

        let patch = TaskPatch {
            done: Some(done),
            ..TaskPatch::default()
        };
        self.repo
            .update(id, patch)
            .await
            .map_err(StoreError::Persistence)?;
        self.tasks[pos].done = done;
        Ok(())
    }

    /// Merge a partial field set into an existing task. A supplied text is
    /// validated and trimmed exactly like creation; an unknown id is a
    /// silent no-op for the same reason as toggle.
    pub async fn update_task(&mut self, id: Uuid, mut patch: TaskPatch) -> Result<(), StoreError> {
        if let Some(text) = &patch.text {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(StoreError::EmptyText);
            }
            patch.text = Some(trimmed.to_string());
        }

        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            warn!(%id, "update for unknown task ignored");
            return Ok(());
        };

        self.repo
            .update(id, patch.clone())
            .await
            .map_err(StoreError::Persistence)?;
        patch.apply(&mut self.tasks[pos]);
        Ok(())
    }

    /// Remove from the repository and the collection; already-absent ids
    /// are a no-op.
    pub async fn delete_task(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.tasks.iter().any(|t| t.id == id) {
            warn!(%id, "delete for unknown task ignored");
            return Ok(());
        }

        self.repo
            .delete(id)
            .await
            .map_err(StoreError::Persistence)?;
        self.tasks.retain(|t| t.id != id);
        debug!(%id, "task deleted");
        Ok(())
    }

    /// Merge view parameters. Pure and infallible.
    pub fn set_view(&mut self, patch: ViewPatch) {
        patch.apply(&mut self.view);
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn derived_view(&self) -> DerivedView {
        derive_view(&self.tasks, &self.view)
    }
}

// Standalone functions for pure logic

/// Project the collection through the view parameters: filter, sort, then
/// one final stable pass that orders every done task after every open one.
pub fn derive_view(tasks: &[Task], view: &ViewConfig) -> DerivedView {
    let counts = status_counts(tasks);
    let progress = if counts.all == 0 {
        0
    } else {
        (100.0 * counts.completed as f64 / counts.all as f64).round() as u8
    };

    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|t| view.status_filter.matches(t))
        .filter(|t| view.tag_filter.matches(t.tag))
        .filter(|t| match view.date_filter {
            Some(date) => t.due_date == Some(date),
            None => true,
        })
        .cloned()
        .collect();

    sort_tasks(&mut visible, view.sort_key);
    // Done tasks always trail open ones, whatever the sort key said. The
    // sorts are stable, so relative order within each group survives.
    visible.sort_by_key(|t| t.done);

    DerivedView {
        visible,
        progress,
        counts,
    }
}

/// Order by the chosen key. Ties keep repository order (stable sorts).
/// Tasks without a due date sort as if dated at the far future.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey) {
    match key {
        SortKey::Priority => tasks.sort_by_key(|t| Reverse(t.priority.rank())),
        SortKey::DueDate => tasks.sort_by_key(|t| t.due_date.unwrap_or(NaiveDate::MAX)),
        SortKey::CreatedAt => tasks.sort_by_key(|t| Reverse(t.created_at)),
    }
}

pub fn status_counts(tasks: &[Task]) -> StatusCounts {
    let completed = tasks.iter().filter(|t| t.done).count();
    StatusCounts {
        all: tasks.len(),
        active: tasks.len() - completed,
        completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Priority, Tag};
    use crate::model::view::{StatusFilter, TagFilter};
    use chrono::{Duration, Utc};

    fn task(text: &str, priority: Priority, done: bool, due: Option<NaiveDate>) -> Task {
        Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            done,
            priority,
            tag: Tag::Personal,
            due_date: due,
            created_at: Utc::now(),
        }
    }

    fn texts(view: &DerivedView) -> Vec<&str> {
        view.visible.iter().map(|t| t.text.as_str()).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn priority_sort_is_stable() {
        // Creation order: low, high, medium, high.
        let tasks = vec![
            task("l", Priority::Low, false, None),
            task("h1", Priority::High, false, None),
            task("m", Priority::Medium, false, None),
            task("h2", Priority::High, false, None),
        ];
        let view = ViewConfig {
            sort_key: SortKey::Priority,
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["h1", "h2", "m", "l"]);
    }

    #[test]
    fn done_tasks_sink_regardless_of_priority() {
        let tasks = vec![
            task("h-done", Priority::High, true, None),
            task("l-open", Priority::Low, false, None),
            task("m-open", Priority::Medium, false, None),
        ];
        let view = ViewConfig {
            sort_key: SortKey::Priority,
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["m-open", "l-open", "h-done"]);
    }

    #[test]
    fn due_date_sorts_ascending_with_missing_last() {
        let tasks = vec![
            task("undated", Priority::Medium, false, None),
            task("late", Priority::Medium, false, date(2025, 1, 20)),
            task("early", Priority::Medium, false, date(2025, 1, 5)),
        ];
        let view = ViewConfig {
            sort_key: SortKey::DueDate,
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["early", "late", "undated"]);
    }

    #[test]
    fn done_overrides_due_date_order() {
        // C is due earlier but done; the done-last rule must win.
        let tasks = vec![
            task("c", Priority::Medium, true, date(2025, 1, 1)),
            task("d", Priority::Medium, false, date(2025, 1, 20)),
        ];
        let view = ViewConfig {
            sort_key: SortKey::DueDate,
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["d", "c"]);
    }

    #[test]
    fn created_at_sorts_newest_first() {
        let base = Utc::now();
        let mut first = task("first", Priority::Medium, false, None);
        first.created_at = base;
        let mut second = task("second", Priority::Medium, false, None);
        second.created_at = base + Duration::seconds(1);

        let tasks = vec![first, second];
        let derived = derive_view(&tasks, &ViewConfig::default());
        assert_eq!(texts(&derived), vec!["second", "first"]);
    }

    #[test]
    fn progress_is_zero_for_empty_collection() {
        let derived = derive_view(&[], &ViewConfig::default());
        assert_eq!(derived.progress, 0);
        assert_eq!(derived.counts, StatusCounts::default());
    }

    #[test]
    fn progress_is_hundred_when_all_done() {
        let tasks = vec![
            task("a", Priority::Medium, true, None),
            task("b", Priority::Medium, true, None),
        ];
        let derived = derive_view(&tasks, &ViewConfig::default());
        assert_eq!(derived.progress, 100);
    }

    #[test]
    fn progress_rounds_to_nearest() {
        let tasks = vec![
            task("a", Priority::Medium, true, None),
            task("b", Priority::Medium, true, None),
            task("c", Priority::Medium, false, None),
        ];
        let derived = derive_view(&tasks, &ViewConfig::default());
        assert_eq!(derived.progress, 67);
    }

    #[test]
    fn counts_reflect_global_state_under_any_filter() {
        let tasks = vec![
            task("a", Priority::Medium, false, None),
            task("b", Priority::Medium, true, None),
            task("c", Priority::Medium, false, None),
            task("d", Priority::Medium, true, None),
            task("e", Priority::Medium, false, None),
        ];
        for sort_key in [SortKey::CreatedAt, SortKey::DueDate, SortKey::Priority] {
            let view = ViewConfig {
                status_filter: StatusFilter::Active,
                sort_key,
                ..ViewConfig::default()
            };
            let derived = derive_view(&tasks, &view);
            assert_eq!(derived.visible.len(), 3);
            assert!(derived.visible.iter().all(|t| !t.done));
            assert_eq!(
                derived.counts,
                StatusCounts {
                    all: 5,
                    active: 3,
                    completed: 2
                }
            );
        }
    }

    #[test]
    fn tag_filter_narrows_visible() {
        let mut work = task("work", Priority::Medium, false, None);
        work.tag = Tag::Work;
        let tasks = vec![work, task("personal", Priority::Medium, false, None)];

        let view = ViewConfig {
            tag_filter: TagFilter::Only(Tag::Work),
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["work"]);
        assert_eq!(derived.counts.all, 2);
    }

    #[test]
    fn date_filter_matches_exact_due_day() {
        let tasks = vec![
            task("hit", Priority::Medium, false, date(2025, 4, 1)),
            task("miss", Priority::Medium, false, date(2025, 4, 2)),
            task("undated", Priority::Medium, false, None),
        ];
        let view = ViewConfig {
            date_filter: date(2025, 4, 1),
            ..ViewConfig::default()
        };
        let derived = derive_view(&tasks, &view);
        assert_eq!(texts(&derived), vec!["hit"]);
    }
}
