/// Audit log model and database operations
///
/// Append-only: this module exposes insert and read operations only, and the
/// schema rejects UPDATE and DELETE on the table with triggers.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE audit_logs (
///     id BLOB PRIMARY KEY NOT NULL,
///     user_id BLOB NOT NULL REFERENCES users(id),
///     action TEXT NOT NULL,
///     resource TEXT NOT NULL,
///     resource_id TEXT NOT NULL,
///     organization_id BLOB NOT NULL REFERENCES organizations(id),
///     timestamp TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::user::Role;

/// One audit record as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: Uuid,

    /// Acting user
    pub user_id: Uuid,

    /// Action label, e.g. `CREATE_TASK`
    pub action: String,

    /// Resource kind, e.g. `Task`
    pub resource: String,

    /// Identifier of the affected resource
    pub resource_id: String,

    pub organization_id: Uuid,

    /// Server-assigned write time
    pub timestamp: DateTime<Utc>,
}

/// Input for appending an audit record
#[derive(Debug, Clone)]
pub struct NewAuditLogEntry {
    pub user_id: Uuid,
    pub action: String,
    pub resource: String,
    pub resource_id: String,
    pub organization_id: Uuid,
}

/// Public identity of the acting user, joined onto audit entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditActor {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Audit record together with the acting user's identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogWithActor {
    #[serde(flatten)]
    pub entry: AuditLogEntry,

    /// None only if the user row has disappeared
    pub user: Option<AuditActor>,
}

#[derive(sqlx::FromRow)]
struct AuditLogRow {
    id: Uuid,
    user_id: Uuid,
    action: String,
    resource: String,
    resource_id: String,
    organization_id: Uuid,
    timestamp: DateTime<Utc>,
    actor_id: Option<Uuid>,
    actor_email: Option<String>,
    actor_role: Option<Role>,
}

impl From<AuditLogRow> for AuditLogWithActor {
    fn from(row: AuditLogRow) -> Self {
        let user = match (row.actor_id, row.actor_email, row.actor_role) {
            (Some(id), Some(email), Some(role)) => Some(AuditActor { id, email, role }),
            _ => None,
        };

        Self {
            entry: AuditLogEntry {
                id: row.id,
                user_id: row.user_id,
                action: row.action,
                resource: row.resource,
                resource_id: row.resource_id,
                organization_id: row.organization_id,
                timestamp: row.timestamp,
            },
            user,
        }
    }
}

impl AuditLogEntry {
    /// Appends a record stamped with the current server time
    pub async fn insert(pool: &SqlitePool, data: NewAuditLogEntry) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AuditLogEntry>(
            r#"
            INSERT INTO audit_logs (id, user_id, action, resource, resource_id, organization_id, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, action, resource, resource_id, organization_id, timestamp
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.action)
        .bind(data.resource)
        .bind(data.resource_id)
        .bind(data.organization_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// Lists one organization's records, newest first, with actor identity
    pub async fn list_by_organization(
        pool: &SqlitePool,
        organization_id: Uuid,
    ) -> Result<Vec<AuditLogWithActor>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AuditLogRow>(
            r#"
            SELECT a.id, a.user_id, a.action, a.resource, a.resource_id, a.organization_id,
                   a.timestamp,
                   u.id AS actor_id, u.email AS actor_email, u.role AS actor_role
            FROM audit_logs a
            LEFT JOIN users u ON u.id = a.user_id
            WHERE a.organization_id = ?
            ORDER BY a.timestamp DESC, a.rowid DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(AuditLogWithActor::from).collect())
    }
}
