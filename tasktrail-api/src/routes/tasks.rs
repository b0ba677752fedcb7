/// Task endpoints
///
/// All handlers receive the caller as an [`Actor`] injected by the JWT layer.
/// Path IDs are taken as strings so that malformed IDs produce the same 404
/// as missing ones.
///
/// # Endpoints
///
/// - `GET /tasks` - List tasks (any role)
/// - `POST /tasks` - Create task (ADMIN, OWNER)
/// - `GET /tasks/:id` - Get task (ADMIN, OWNER)
/// - `PUT /tasks/:id` - Update task (ADMIN, OWNER)
/// - `DELETE /tasks/:id` - Delete task (OWNER)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tasktrail_shared::auth::policy::{authorize, Access, Actor};
use tasktrail_shared::models::task::Task;
use tasktrail_shared::service::tasks::{self, NewTask, TaskUpdate};

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(tasks::list_tasks(&state.db, &actor).await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    let task_id = tasks::parse_task_id(&id)?;
    Ok(Json(tasks::get_task(&state.db, &actor, task_id).await?))
}

/// Create task
///
/// ```text
/// POST /tasks
///
/// { "title": "Ship v1", "category": "Work", "priority": "high" }
/// ```
///
/// Returns `201 Created` with the stored task. The role gate is checked
/// before the body, so a VIEWER gets 403 whatever it sends.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    authorize(&actor, Access::Manager)?;
    let Json(req) = body?;

    let task = tasks::create_task(&state.db, &actor, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update task
///
/// Only the supplied fields change. `description` and `dueDate` accept
/// `null` to clear them.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<TaskUpdate>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    authorize(&actor, Access::Manager)?;
    let Json(req) = body?;

    let task_id = tasks::parse_task_id(&id)?;
    Ok(Json(tasks::update_task(&state.db, &actor, task_id, req).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let task_id = tasks::parse_task_id(&id)?;
    tasks::delete_task(&state.db, &actor, task_id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
