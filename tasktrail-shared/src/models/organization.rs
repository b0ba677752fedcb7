/// Organization model and database operations
///
/// An organization is the tenant: the isolation boundary every user, task and
/// audit entry belongs to. Organizations are created out of band (seeding or
/// provisioning); the application never renames or deletes them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     id BLOB PRIMARY KEY NOT NULL,
///     name TEXT NOT NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Organization (tenant) record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Unique organization ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// When the organization was created
    pub created_at: DateTime<Utc>,

    /// When the organization was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    /// Display name
    pub name: String,
}

impl Organization {
    /// Creates a new organization
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(pool: &SqlitePool, data: CreateOrganization) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.name)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Finds an organization by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds an organization by its exact name
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM organizations
            WHERE name = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
