/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login
/// - `tasks`: Task CRUD
/// - `users`: Organization user directory
/// - `audit`: Audit trail

pub mod audit;
pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
