//! Task operations.
//!
//! Each operation follows the same order: role gate, input validation,
//! tenant-scoped lookup, per-record rule, storage write, audit record.
//! The audit write happens after the task write commits; an audit failure is
//! returned to the caller but does not undo the task change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::audit::{self, AuditAction, AuditEvent};
use crate::auth::policy::{authorize, authorize_task_read, Access, Actor};
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskCategory, TaskPriority, TaskStatus};

/// Body of a create request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

/// Body of an update request
///
/// Absent fields keep their stored value. `description` and `dueDate` can be
/// cleared with an explicit `null`, which is why they are double options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Present-but-null deserializes to `Some(None)`; absent stays `None` via `default`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskUpdate {
    /// Merges supplied fields over `task`
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// Parses a task ID from a path segment
///
/// Malformed IDs are reported as a missing task.
pub fn parse_task_id(raw: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::task_not_found())
}

/// Tenant-scoped lookup followed by the single-record read rule
async fn load_checked(pool: &SqlitePool, actor: &Actor, task_id: Uuid) -> ServiceResult<Task> {
    let task = Task::find_in_organization(pool, task_id, actor.organization_id)
        .await?
        .ok_or_else(ServiceError::task_not_found)?;

    authorize_task_read(actor)?;

    Ok(task)
}

/// All tasks of the actor's organization, newest first
pub async fn list_tasks(pool: &SqlitePool, actor: &Actor) -> ServiceResult<Vec<Task>> {
    authorize(actor, Access::Member)?;

    Ok(Task::list_by_organization(pool, actor.organization_id).await?)
}

/// One task of the actor's organization
pub async fn get_task(pool: &SqlitePool, actor: &Actor, task_id: Uuid) -> ServiceResult<Task> {
    authorize(actor, Access::Member)?;

    load_checked(pool, actor, task_id).await
}

/// Creates a task in the actor's organization and records `CREATE_TASK`
pub async fn create_task(pool: &SqlitePool, actor: &Actor, input: NewTask) -> ServiceResult<Task> {
    authorize(actor, Access::Manager)?;
    input.validate()?;

    let task = Task::create(
        pool,
        CreateTask {
            organization_id: actor.organization_id,
            title: input.title,
            description: input.description,
            category: input.category.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            due_date: input.due_date,
        },
    )
    .await?;

    audit::record(pool, AuditEvent::task(actor, AuditAction::CreateTask, task.id)).await?;

    info!(
        task_id = %task.id,
        organization_id = %task.organization_id,
        user_id = %actor.user_id,
        "Task created"
    );

    Ok(task)
}

/// Applies a partial update and records `UPDATE_TASK`
pub async fn update_task(
    pool: &SqlitePool,
    actor: &Actor,
    task_id: Uuid,
    changes: TaskUpdate,
) -> ServiceResult<Task> {
    authorize(actor, Access::Manager)?;
    changes.validate()?;

    let mut task = load_checked(pool, actor, task_id).await?;
    changes.apply_to(&mut task);

    // Row may have been deleted between lookup and write
    let task = task
        .save(pool)
        .await?
        .ok_or_else(ServiceError::task_not_found)?;

    audit::record(pool, AuditEvent::task(actor, AuditAction::UpdateTask, task.id)).await?;

    info!(
        task_id = %task.id,
        status = task.status.as_str(),
        user_id = %actor.user_id,
        "Task updated"
    );

    Ok(task)
}

/// Deletes a task and records `DELETE_TASK`
pub async fn delete_task(pool: &SqlitePool, actor: &Actor, task_id: Uuid) -> ServiceResult<()> {
    authorize(actor, Access::Owner)?;

    let task = load_checked(pool, actor, task_id).await?;

    if !Task::delete_in_organization(pool, task.id, actor.organization_id).await? {
        return Err(ServiceError::task_not_found());
    }

    audit::record(pool, AuditEvent::task(actor, AuditAction::DeleteTask, task.id)).await?;

    info!(task_id = %task.id, user_id = %actor.user_id, "Task deleted");

    Ok(())
}
