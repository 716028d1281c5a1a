use chrono::NaiveDate;

use crate::model::task::{Tag, Task};

/// Which completion states are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Active,
    Completed,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.done,
            StatusFilter::Completed => task.done,
        }
    }
}

/// Which tag is visible, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilter {
    All,
    Only(Tag),
}

impl Default for TagFilter {
    fn default() -> Self {
        TagFilter::All
    }
}

impl TagFilter {
    pub fn matches(&self, tag: Tag) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Only(wanted) => *wanted == tag,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    DueDate,
    Priority,
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::CreatedAt
    }
}

/// View parameters the presentation layer reads and writes. Changing these
/// never touches the task collection itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewConfig {
    pub status_filter: StatusFilter,
    pub tag_filter: TagFilter,
    pub sort_key: SortKey,
    /// When set, only tasks due on exactly this date are visible.
    pub date_filter: Option<NaiveDate>,
}

/// Partial view update; the nested option on `date_filter` distinguishes
/// "unchanged" from "clear the date filter".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewPatch {
    pub status_filter: Option<StatusFilter>,
    pub tag_filter: Option<TagFilter>,
    pub sort_key: Option<SortKey>,
    pub date_filter: Option<Option<NaiveDate>>,
}

impl ViewPatch {
    pub fn apply(&self, config: &mut ViewConfig) {
        if let Some(status_filter) = self.status_filter {
            config.status_filter = status_filter;
        }
        if let Some(tag_filter) = self.tag_filter {
            config.tag_filter = tag_filter;
        }
        if let Some(sort_key) = self.sort_key {
            config.sort_key = sort_key;
        }
        if let Some(date_filter) = self.date_filter {
            config.date_filter = date_filter;
        }
    }
}
