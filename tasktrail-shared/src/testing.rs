//! Fixtures shared by the unit tests of this crate.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::user::{CreateUser, Role, User};

pub async fn migrated_pool() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn create_organization(pool: &SqlitePool, name: &str) -> Organization {
    Organization::create(
        pool,
        CreateOrganization {
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

/// Creates a user whose password hash is a placeholder; it cannot log in.
pub async fn create_user(pool: &SqlitePool, organization_id: Uuid, email: &str, role: Role) -> User {
    User::create(
        pool,
        CreateUser {
            email: email.to_string(),
            password_hash: "test_hash".to_string(),
            role,
            organization_id,
        },
    )
    .await
    .unwrap()
}
