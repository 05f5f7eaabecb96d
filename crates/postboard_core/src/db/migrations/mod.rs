//! Schema steps for the document database.
//!
//! Steps are `(version, sql)` pairs in strictly increasing version order.
//! All pending steps run in one transaction together with the
//! `user_version` bump.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[(u32, &str)] = &[(1, include_str!("0001_documents.sql"))];

/// Newest schema version this build can read and write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _)| *version)
}

/// Brings `conn` to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stored: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let supported = latest_version();
    if stored > supported {
        return Err(DbError::SchemaTooNew { stored, supported });
    }

    let pending: Vec<_> = STEPS
        .iter()
        .filter(|(version, _)| *version > stored)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in &pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} steps={}",
        stored,
        supported,
        pending.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, STEPS};
    use rusqlite::Connection;

    #[test]
    fn steps_are_strictly_increasing() {
        assert!(STEPS.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert_eq!(latest_version(), STEPS.len() as u32);
    }

    #[test]
    fn rerunning_on_current_schema_is_a_no_op() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO documents (key, value) VALUES ('projects', '[]');",
            [],
        )
        .unwrap();

        apply_migrations(&mut conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
