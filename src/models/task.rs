use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Default page size for task listings.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// A task as stored in the `tasks` table and returned by the API.
///
/// `owner_id` is kept server-side; clients only ever see their own tasks so it
/// carries no information for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Monotonically increasing identifier; also the creation order.
    pub id: i64,
    pub title: String,
    /// Empty string when no description was given.
    pub description: String,
    pub completed: bool,
    #[serde(skip)]
    pub owner_id: i64,
}

/// Payload for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Optional, at most 1000 characters.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl NewTask {
    /// The description to persist: absent becomes the empty string, never NULL.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Partial update for a task.
///
/// Each field is either absent (`None`, left untouched) or present with a value
/// that overwrites the stored one. Setting `completed` to `false` or
/// `description` to `""` is an explicit change, not an omission.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 255))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Overwrites the fields present in the patch and returns the result.
    pub fn apply_to(self, mut task: Task) -> Task {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task
    }
}

/// Listing order, keyed on task id.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Descending id.
    #[default]
    Newest,
    /// Ascending id.
    Oldest,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Newest => "DESC",
            SortOrder::Oldest => "ASC",
        }
    }
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskListQuery {
    /// Only tasks whose `completed` flag matches; no constraint when absent.
    pub completed: Option<bool>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl Default for TaskListQuery {
    fn default() -> Self {
        Self {
            completed: None,
            sort: SortOrder::default(),
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of a task listing.
///
/// `total` counts every task of the owner that matches the filter, ignoring
/// `skip` and `limit`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskPage {
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub items: Vec<Task>,
}
