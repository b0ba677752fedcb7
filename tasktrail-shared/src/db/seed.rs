/// Demo data for local development
///
/// Creates one organization with an owner, an admin and a viewer, all sharing
/// [`DEMO_PASSWORD`]. Seeding is skipped when the demo organization already
/// exists, so it is safe to run on every startup.

use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password::{hash_password, PasswordError};
use crate::models::organization::{CreateOrganization, Organization};
use crate::models::user::{CreateUser, Role, User};

pub const DEMO_ORGANIZATION: &str = "Demo Organization";
pub const DEMO_PASSWORD: &str = "tasktrail-demo";

/// Demo accounts as `(email, role)`
pub const DEMO_ACCOUNTS: [(&str, Role); 3] = [
    ("owner@demo.tasktrail.dev", Role::Owner),
    ("admin@demo.tasktrail.dev", Role::Admin),
    ("viewer@demo.tasktrail.dev", Role::Viewer),
];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Seeds the demo organization
///
/// Returns the organization, or `None` if it was already present.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<Option<Organization>, SeedError> {
    if Organization::find_by_name(pool, DEMO_ORGANIZATION).await?.is_some() {
        info!("Demo organization already present, skipping seed");
        return Ok(None);
    }

    let organization = Organization::create(
        pool,
        CreateOrganization {
            name: DEMO_ORGANIZATION.to_string(),
        },
    )
    .await?;

    let password_hash = hash_password(DEMO_PASSWORD)?;

    for (email, role) in DEMO_ACCOUNTS {
        User::create(
            pool,
            CreateUser {
                email: email.to_string(),
                password_hash: password_hash.clone(),
                role,
                organization_id: organization.id,
            },
        )
        .await?;
    }

    info!(
        organization_id = %organization.id,
        accounts = DEMO_ACCOUNTS.len(),
        "Seeded demo organization"
    );

    Ok(Some(organization))
}
