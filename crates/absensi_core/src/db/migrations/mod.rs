//! Schema steps for `kv_entries`.
//!
//! Each step is identified by `version` (mirrored to `PRAGMA user_version`)
//! and a short `name` that failures carry. Pending steps run in one
//! transaction, so a failure leaves the previous version in place.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

impl Migration {
    fn failed(&self, source: rusqlite::Error) -> DbError {
        DbError::Migration {
            version: self.version,
            name: self.name,
            source,
        }
    }
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Schema version recorded in the database file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))
        .map_err(DbError::Open)
}

/// Runs every migration newer than the file's schema version.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` naming the step that failed; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    run(conn, MIGRATIONS)
}

fn run(conn: &mut Connection, steps: &[Migration]) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = steps.last().map_or(0, |migration| migration.version);
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending: Vec<&Migration> = steps
        .iter()
        .filter(|migration| migration.version > found)
        .collect();
    let Some(last) = pending.last().copied() else {
        return Ok(());
    };

    let tx = conn.transaction().map_err(DbError::Open)?;
    for migration in &pending {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| {
                error!(
                    "event=db_migrate module=db status=error version={} name={}",
                    migration.version, migration.name
                );
                migration.failed(source)
            })?;
    }
    tx.commit().map_err(|source| last.failed(source))?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        found,
        last.version,
        pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, schema_version, Migration, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn failing_step_is_named_and_rolls_back_the_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        let steps = [
            MIGRATIONS[0],
            Migration {
                version: 2,
                name: "broken_step",
                sql: "ALTER TABLE missing_table ADD COLUMN x TEXT;",
            },
        ];

        let err = run(&mut conn, &steps).unwrap_err();

        match err {
            DbError::Migration { version, name, .. } => {
                assert_eq!(version, 2);
                assert_eq!(name, "broken_step");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(schema_version(&conn).unwrap(), 0);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_entries';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0);
    }

    #[test]
    fn up_to_date_schema_is_left_alone() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn, MIGRATIONS).unwrap();
        run(&mut conn, MIGRATIONS).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 1);
    }
}
