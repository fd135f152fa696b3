use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

/// Applies every `*.sql` file in `migrations_dir` that is not yet recorded
/// in `_migrations`, in file-name order. Each file runs in its own
/// transaction together with its bookkeeping row.
pub fn run_migrations(conn: &mut Connection, migrations_dir: &Path) -> rusqlite::Result<usize> {
    tracing::debug!(dir = %migrations_dir.display(), "Checking for database migrations");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let files = migration_files(migrations_dir);
    tracing::debug!(count = files.len(), "Found migration files");

    let mut applied = 0;
    for (name, path) in files {
        let already_applied: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM _migrations WHERE name = ?)",
            [&name],
            |row| row.get(0),
        )?;
        if already_applied {
            continue;
        }

        let sql = fs::read_to_string(&path)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        tracing::info!(migration = %name, "Applying migration");
        let tx = conn.transaction()?;
        tx.execute_batch(&sql)?;
        tx.execute("INSERT INTO _migrations (name) VALUES (?)", [&name])?;
        tx.commit()?;
        applied += 1;
    }

    if applied > 0 {
        tracing::info!(count = applied, "Migrations applied successfully");
    } else {
        tracing::debug!("No new migrations to apply");
    }

    Ok(applied)
}

fn migration_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let mut files: Vec<(String, PathBuf)> = fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "sql"))
                .filter_map(|p| {
                    let name = p.file_name()?.to_string_lossy().into_owned();
                    Some((name, p))
                })
                .collect()
        })
        .unwrap_or_else(|e| {
            tracing::warn!(dir = %dir.display(), error = %e, "Migrations directory unreadable");
            Vec::new()
        });

    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}
