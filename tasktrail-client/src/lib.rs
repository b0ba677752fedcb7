//! # TaskTrail Client
//!
//! HTTP client and session cache for the TaskTrail API, plus the `tasktrail`
//! command-line front end.
//!
//! ## Modules
//!
//! - `client`: Typed calls for every API endpoint
//! - `session`: Stored login session and its backing stores
//! - `cli`: Command parsing and output
//! - `error`: Client error types

pub mod cli;
pub mod client;
pub mod error;
pub mod session;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionCache, SessionStore};
