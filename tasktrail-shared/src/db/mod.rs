/// Database layer for TaskTrail
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded migration runner
/// - `seed`: Demo organization and accounts for local development
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
pub mod seed;
