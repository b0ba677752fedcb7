/// Tenant-scoped access policy
///
/// Every data-access operation receives an explicit [`Actor`] built from a
/// verified session token, then asks this module whether the actor's role
/// clears the operation's [`Access`] gate. Tenant isolation itself is enforced
/// by the storage queries, which always filter on `actor.organization_id`.
///
/// # Gates
///
/// | Operation         | Gate               |
/// |-------------------|--------------------|
/// | list tasks        | `Access::Member`   |
/// | get task          | `Access::Member`, then not VIEWER after lookup |
/// | create task       | `Access::Manager`  |
/// | update task       | `Access::Manager`  |
/// | delete task       | `Access::Owner`    |
/// | list users        | `Access::Manager`  |
/// | read audit log    | `Access::Manager`  |
///
/// # Example
///
/// ```
/// use tasktrail_shared::auth::policy::{authorize, Access, Actor};
/// use tasktrail_shared::models::user::Role;
/// use uuid::Uuid;
///
/// let admin = Actor::new(Uuid::new_v4(), Uuid::new_v4(), Role::Admin);
/// assert!(authorize(&admin, Access::Manager).is_ok());
/// assert!(authorize(&admin, Access::Owner).is_err());
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{Role, User};

/// The caller of an operation, as stored when its token was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, organization_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            organization_id,
            role,
        }
    }

}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.organization_id, user.role)
    }
}

/// Role gate an operation requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any authenticated user
    Member,

    /// ADMIN or OWNER
    Manager,

    /// OWNER only
    Owner,
}

impl Access {
    /// Lowest role that clears this gate
    pub fn min_role(&self) -> Role {
        match self {
            Access::Member => Role::Viewer,
            Access::Manager => Role::Admin,
            Access::Owner => Role::Owner,
        }
    }
}

/// The actor's role is below the gate's minimum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Insufficient permissions: requires {required}, has {actual}")]
pub struct InsufficientRole {
    pub required: Role,
    pub actual: Role,
}

/// Checks an actor against a gate
pub fn authorize(actor: &Actor, access: Access) -> Result<(), InsufficientRole> {
    let required = access.min_role();

    if actor.role.at_least(required) {
        Ok(())
    } else {
        Err(InsufficientRole {
            required,
            actual: actor.role,
        })
    }
}

/// Single-task read rule, applied after the tenant-scoped lookup succeeded
///
/// Listing tasks is open to viewers but reading one task is not.
pub fn authorize_task_read(actor: &Actor) -> Result<(), InsufficientRole> {
    if actor.role == Role::Viewer {
        return Err(InsufficientRole {
            required: Role::Admin,
            actual: actor.role,
        });
    }

    Ok(())
}
