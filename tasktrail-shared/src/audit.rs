//! Audit recorder.
//!
//! Mutating task operations append one record here after the mutation has
//! been persisted. The two writes are not wrapped in a transaction: if the
//! audit insert fails, the mutation stays applied and the error is returned
//! to the caller.
//!
//! Every record is also emitted as a structured `tracing` event on the
//! `audit` target.

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::auth::policy::{authorize, Access, Actor};
use crate::error::ServiceResult;
use crate::models::audit_log::{AuditLogEntry, AuditLogWithActor, NewAuditLogEntry};

/// Action labels written by the task service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreateTask => "CREATE_TASK",
            AuditAction::UpdateTask => "UPDATE_TASK",
            AuditAction::DeleteTask => "DELETE_TASK",
        }
    }
}

/// Resource label for tasks
pub const TASK_RESOURCE: &str = "Task";

/// One mutation to be recorded
///
/// The organization is always the actor's.
#[derive(Debug, Clone, Copy)]
pub struct AuditEvent<'a> {
    pub actor: &'a Actor,
    pub action: AuditAction,
    pub resource: &'a str,
    pub resource_id: Uuid,
}

impl<'a> AuditEvent<'a> {
    pub fn task(actor: &'a Actor, action: AuditAction, task_id: Uuid) -> Self {
        Self {
            actor,
            action,
            resource: TASK_RESOURCE,
            resource_id: task_id,
        }
    }
}

/// Appends an audit record with the current server time
pub async fn record(pool: &SqlitePool, event: AuditEvent<'_>) -> Result<AuditLogEntry, sqlx::Error> {
    let entry = AuditLogEntry::insert(
        pool,
        NewAuditLogEntry {
            user_id: event.actor.user_id,
            action: event.action.as_str().to_string(),
            resource: event.resource.to_string(),
            resource_id: event.resource_id.to_string(),
            organization_id: event.actor.organization_id,
        },
    )
    .await?;

    info!(
        target: "audit",
        audit_id = %entry.id,
        user_id = %entry.user_id,
        organization_id = %entry.organization_id,
        action = %entry.action,
        resource = %entry.resource,
        resource_id = %entry.resource_id,
        "AUDIT"
    );

    Ok(entry)
}

/// Reads the actor's organization audit trail, newest first
///
/// Restricted to ADMIN and OWNER.
pub async fn list_for_organization(
    pool: &SqlitePool,
    actor: &Actor,
) -> ServiceResult<Vec<AuditLogWithActor>> {
    authorize(actor, Access::Manager)?;

    Ok(AuditLogEntry::list_by_organization(pool, actor.organization_id).await?)
}
