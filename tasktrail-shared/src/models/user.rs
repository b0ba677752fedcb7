/// User model and database operations
///
/// This module provides the User model and the read/write operations the
/// application needs. A user belongs to exactly one organization for its
/// lifetime and carries a single [`Role`] within it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BLOB PRIMARY KEY NOT NULL,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL CHECK (role IN ('VIEWER', 'ADMIN', 'OWNER')),
///     organization_id BLOB NOT NULL REFERENCES organizations(id),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasktrail_shared::models::user::{CreateUser, Role, User};
/// use sqlx::SqlitePool;
/// use uuid::Uuid;
///
/// # async fn example(pool: SqlitePool, organization_id: Uuid) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "owner@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::Owner,
///     organization_id,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "OWNER@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Privilege level of a user inside its organization
///
/// Variants are declared from least to most privileged, so the derived
/// `Ord` gives the total order `Viewer < Admin < Owner`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Read-only access to the task list
    Viewer,

    /// Can read, create and update tasks, list users and read the audit log
    Admin,

    /// Everything an admin can do, plus deleting tasks
    Owner,
}

impl Role {
    /// Converts role to its stored/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Viewer => "VIEWER",
            Role::Admin => "ADMIN",
            Role::Owner => "OWNER",
        }
    }

    /// True when this role is at least as privileged as `required`
    pub fn at_least(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VIEWER" => Ok(Role::Viewer),
            "ADMIN" => Ok(Role::Admin),
            "OWNER" => Ok(Role::Owner),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User account
///
/// The password hash is never serialized; anything sent over the wire goes
/// through this type or a narrower projection of it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Email address, unique across all organizations (case-insensitive)
    pub email: String,

    /// Argon2id password hash in PHC format
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role within the owning organization
    pub role: Role,

    /// Owning organization
    pub organization_id: Uuid,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Role within the organization
    pub role: Role,

    /// Owning organization
    pub organization_id: Uuid,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken (unique constraint) or
    /// the organization does not exist (foreign key).
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, role, organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, email, password_hash, role, organization_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.organization_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, organization_id, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, organization_id, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Lists the users of one organization, oldest account first
    pub async fn list_by_organization(
        pool: &SqlitePool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, organization_id, created_at, updated_at
            FROM users
            WHERE organization_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }
}
