//! Reference data for the sandbox.
//!
//! Recreates the `employees` table the exercises are written against.

use super::DatabaseClient;
use crate::error::Result;
use tracing::info;

/// The seed script. Portable across MySQL, PostgreSQL and SQLite.
pub const SEED_SQL: &str = include_str!("seed.sql");

/// Splits the seed script into individual statements.
///
/// The script holds no semicolons inside literals, so a plain split is exact.
pub fn seed_statements() -> impl Iterator<Item = &'static str> {
    SEED_SQL
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
}

/// Drops, recreates and fills the reference table.
pub async fn apply_seed(db: &dyn DatabaseClient) -> Result<()> {
    for statement in seed_statements() {
        db.execute_statement(statement).await?;
    }
    info!("Seeded reference table 'employees'");
    Ok(())
}
