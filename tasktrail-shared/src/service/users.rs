//! User directory.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::policy::{authorize, Access, Actor};
use crate::error::ServiceResult;
use crate::models::user::{Role, User};

/// Directory projection of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Lists the actor's organization members, oldest account first
///
/// Restricted to ADMIN and OWNER.
pub async fn list_organization_users(pool: &SqlitePool, actor: &Actor) -> ServiceResult<Vec<User>> {
    authorize(actor, Access::Manager)?;

    Ok(User::list_by_organization(pool, actor.organization_id).await?)
}
