/// Task model and database operations
///
/// Tasks are the tracked work items of an organization. Every query in this
/// module takes the organization ID and filters on it, so a task belonging to
/// another tenant is indistinguishable from a missing one.
///
/// # Lifecycle
///
/// ```text
/// created → (updated)* → deleted
/// ```
///
/// `status` is a plain field, not a workflow: any status may be set at any
/// time.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BLOB PRIMARY KEY NOT NULL,
///     title TEXT NOT NULL,
///     description TEXT,
///     category TEXT NOT NULL DEFAULT 'General',
///     status TEXT NOT NULL DEFAULT 'todo',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     due_date TEXT,
///     organization_id BLOB NOT NULL REFERENCES organizations(id),
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Task category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum TaskCategory {
    Work,
    Personal,
    #[default]
    General,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::General => "General",
        }
    }
}

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Converts status to its stored/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Category, `General` unless set
    pub category: TaskCategory,

    /// Workflow status, `todo` unless set
    pub status: TaskStatus,

    /// Priority, `medium` unless set
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Owning organization
    pub organization_id: Uuid,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a task
///
/// `organization_id` always comes from the authenticated actor, never from a
/// request body.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub organization_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: TaskCategory,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Inserts a new task
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, title, description, category, status, priority, due_date,
                               organization_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, category, status, priority, due_date,
                      organization_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.title)
        .bind(data.description)
        .bind(data.category)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.organization_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    /// Finds a task by ID within one organization
    ///
    /// Returns `None` both when the task does not exist and when it belongs to
    /// a different organization.
    pub async fn find_in_organization(
        pool: &SqlitePool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, category, status, priority, due_date,
                   organization_id, created_at, updated_at
            FROM tasks
            WHERE id = ? AND organization_id = ?
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all tasks of one organization, newest first
    pub async fn list_by_organization(
        pool: &SqlitePool,
        organization_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, category, status, priority, due_date,
                   organization_id, created_at, updated_at
            FROM tasks
            WHERE organization_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Persists every mutable field of `self` and refreshes `updated_at`
    ///
    /// The write is scoped by both ID and organization. Returns `None` if no
    /// row matched.
    pub async fn save(&self, pool: &SqlitePool) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, category = ?, status = ?, priority = ?,
                due_date = ?, updated_at = ?
            WHERE id = ? AND organization_id = ?
            RETURNING id, title, description, category, status, priority, due_date,
                      organization_id, created_at, updated_at
            "#,
        )
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.category)
        .bind(self.status)
        .bind(self.priority)
        .bind(self.due_date)
        .bind(Utc::now())
        .bind(self.id)
        .bind(self.organization_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task within one organization
    ///
    /// Returns true if a row was removed.
    pub async fn delete_in_organization(
        pool: &SqlitePool,
        id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND organization_id = ?")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
