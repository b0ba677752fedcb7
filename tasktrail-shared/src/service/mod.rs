/// Application operations
///
/// Everything here takes the caller as an explicit
/// [`Actor`](crate::auth::policy::Actor) and returns
/// [`ServiceError`](crate::error::ServiceError). Transport layers only
/// translate requests in and results out.
///
/// - [`identity`]: login and session resolution
/// - [`tasks`]: task CRUD with audit records
/// - [`users`]: organization user directory

pub mod identity;
pub mod tasks;
pub mod users;
