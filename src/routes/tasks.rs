use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskListQuery, TaskPatch},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;

/// Lists the authenticated user's tasks, one page at a time.
///
/// ## Query Parameters:
/// - `completed` (optional): only tasks with this completion state.
/// - `sort` (optional): `newest` (default, descending id) or `oldest`.
/// - `skip` (optional): number of matching tasks to skip, `>= 0`, default 0.
/// - `limit` (optional): page size in `1..=100`, default 20.
///
/// ## Responses:
/// - `200 OK`: `{total, skip, limit, items}` where `total` ignores pagination.
/// - `400 Bad Request`: unparsable query string.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: `skip` or `limit` out of range.
#[get("")]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, AppError> {
    let page = state.tasks.list(user.id(), &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 255 characters.
/// - `description` (optional): at most 1000 characters; stored as `""` when absent.
///
/// ## Responses:
/// - `201 Created`: the new task, with `completed: false`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: title or description length out of range.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.create(user.id(), task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Partially updates a task. Fields missing from the body are left as they are.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task, or it belongs to another user.
/// - `422 Unprocessable Entity`: a present field fails validation.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
    patch: web::Json<TaskPatch>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.id(), task_id.into_inner(), patch.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: `{"detail": "Deleted"}`.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    state.tasks.delete(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "detail": "Deleted" })))
}
