//! Migration service - applies embedded SQL files to a DuckDB connection
//!
//! Both the key-value database and logs.duckdb are migrated here; each
//! caller passes its own `(file name, sql)` list. Applied names are kept in
//! sys_migrations, which the `000_migrations.sql` entry of every list
//! creates, so re-running a list is a no-op.

use std::collections::HashSet;

use anyhow::Result;
use duckdb::Connection;

/// Outcome of [`MigrationService::run_pending`]
#[derive(Debug)]
pub struct MigrationResult {
    /// Names applied by this run, in list order
    pub applied: Vec<String>,
    /// How many entries of the list had been applied before this run
    pub already_applied: usize,
}

pub struct MigrationService<'a> {
    conn: &'a Connection,
    migrations: &'static [(&'static str, &'static str)],
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, migrations: &'static [(&'static str, &'static str)]) -> Self {
        Self { conn, migrations }
    }

    /// Apply every migration in the list that sys_migrations does not name yet
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let done = if self.migrations_table_exists()? {
            self.applied_names()?
        } else {
            HashSet::new()
        };

        let mut applied = Vec::new();
        let mut already_applied = 0;

        // 000_migrations.sql is listed first, so sys_migrations exists
        // before anything is recorded in it
        for (name, sql) in self.migrations {
            if done.contains(*name) {
                already_applied += 1;
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.conn.execute(
                "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                [*name],
            )?;
            applied.push(name.to_string());
        }

        Ok(MigrationResult {
            applied,
            already_applied,
        })
    }

    fn migrations_table_exists(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn applied_names(&self) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT migration_name FROM sys_migrations")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<HashSet<String>>>()?;
        Ok(names)
    }
}
