//! # TaskTrail Shared Library
//!
//! Domain types, storage and business rules used by the TaskTrail API server
//! and client.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `db`: Connection pool, migrations and demo seeding
//! - `auth`: Passwords, session tokens and the role policy
//! - `audit`: Audit recorder
//! - `service`: Login, task and user operations
//! - `error`: Service error type

pub mod audit;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

#[cfg(test)]
mod testing;

/// Current version of the TaskTrail shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
