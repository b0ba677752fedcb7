/// Database models for TaskTrail
///
/// Each model owns its SQL. Models that hold tenant data take the
/// organization ID on every read and write.
///
/// # Models
///
/// - `organization`: Tenants
/// - `user`: User accounts and the [`user::Role`] hierarchy
/// - `task`: Tracked work items
/// - `audit_log`: Append-only audit trail

pub mod audit_log;
pub mod organization;
pub mod task;
pub mod user;
