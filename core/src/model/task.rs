use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    /// Numeric rank used by the priority sort, highest first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Work,
    Personal,
    Study,
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Personal
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub done: bool,
    pub priority: Priority,
    pub tag: Tag,

    // Date-only on purpose: due dates carry no time component and are
    // compared at calendar-day granularity.
    pub due_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Materialize a draft into a full record. Used by repository backends
    /// that assign identity locally; remote backends receive the assigned
    /// fields from the record service instead.
    pub fn new(draft: NewTask) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: draft.text,
            done: false,
            priority: draft.priority,
            tag: draft.tag,
            due_date: draft.due_date,
            created_at: Utc::now(),
        }
    }
}

/// Caller-supplied fields for task creation. Identity and timestamps are
/// assigned by the repository, never by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub priority: Priority,
    pub tag: Tag,
    pub due_date: Option<NaiveDate>,
}

/// Partial update for an existing task. `None` leaves a field untouched;
/// the nested option on `due_date` distinguishes "unchanged" (`None`) from
/// "clear the date" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub done: Option<bool>,
    pub priority: Option<Priority>,
    pub tag: Option<Tag>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(done) = self.done {
            task.done = done;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(tag) = self.tag {
            task.tag = tag;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}
