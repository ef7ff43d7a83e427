pub mod task;
pub mod user;

pub use task::{NewTask, SortOrder, Task, TaskListQuery, TaskPage, TaskPatch};
pub use user::{User, UserProfile};
