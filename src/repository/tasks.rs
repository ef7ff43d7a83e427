use crate::{
    error::AppError,
    models::{NewTask, Task, TaskListQuery, TaskPage, TaskPatch},
};
use log::debug;
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

const TASK_COLUMNS: &str = "id, title, description, completed, owner_id";

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// Owner-scoped task storage.
///
/// Every method takes the owning identity's id and every statement filters on
/// `(id, owner_id)` together, so a task belonging to someone else is reported
/// exactly like a task that does not exist. Each call runs in one transaction
/// that is only committed on success.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner_id: i64, input: NewTask) -> Result<Task, AppError> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, completed, owner_id) VALUES (?, ?, ?, ?) \
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&input.title)
        .bind(input.description_or_empty())
        .bind(false)
        .bind(owner_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!("Created task {} for user {}", task.id, owner_id);
        Ok(task)
    }

    /// Lists one page of the owner's tasks.
    ///
    /// The count and the page are read inside the same transaction, so `total`
    /// and `items` describe the same snapshot.
    pub async fn list(&self, owner_id: i64, query: &TaskListQuery) -> Result<TaskPage, AppError> {
        query.validate()?;

        let mut condition = String::from("owner_id = ?");
        if query.completed.is_some() {
            condition.push_str(" AND completed = ?");
        }
        let count_sql = format!("SELECT COUNT(*) FROM tasks WHERE {}", condition);
        let page_sql = format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY id {} LIMIT ? OFFSET ?",
            TASK_COLUMNS,
            condition,
            query.sort.as_sql()
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(owner_id);
        let mut page_query = sqlx::query_as::<_, Task>(&page_sql).bind(owner_id);
        if let Some(completed) = query.completed {
            count_query = count_query.bind(completed);
            page_query = page_query.bind(completed);
        }

        let mut tx = self.pool.begin().await?;
        let total = count_query.fetch_one(&mut *tx).await?;
        let items = page_query
            .bind(query.limit)
            .bind(query.skip)
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(TaskPage {
            total,
            skip: query.skip,
            limit: query.limit,
            items,
        })
    }

    /// Applies `patch` to the owner's task `task_id`.
    ///
    /// Returns `AppError::NotFound` if the owner has no such task.
    pub async fn update(
        &self,
        owner_id: i64,
        task_id: i64,
        patch: TaskPatch,
    ) -> Result<Task, AppError> {
        patch.validate()?;

        let mut tx = self.pool.begin().await?;
        let current = find_owned(&mut *tx, owner_id, task_id)
            .await?
            .ok_or_else(task_not_found)?;
        let patched = patch.apply_to(current);

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET title = ?, description = ?, completed = ? \
             WHERE id = ? AND owner_id = ? RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&patched.title)
        .bind(&patched.description)
        .bind(patched.completed)
        .bind(task_id)
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(task_not_found)?;
        tx.commit().await?;

        Ok(task)
    }

    /// Removes the owner's task `task_id` permanently.
    ///
    /// Returns `AppError::NotFound` if the owner has no such task.
    pub async fn delete(&self, owner_id: i64, task_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(task_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(task_not_found());
        }
        tx.commit().await?;

        debug!("Deleted task {} of user {}", task_id, owner_id);
        Ok(())
    }
}

async fn find_owned(
    conn: &mut SqliteConnection,
    owner_id: i64,
    task_id: i64,
) -> Result<Option<Task>, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = ? AND owner_id = ?",
        TASK_COLUMNS
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(task)
}
