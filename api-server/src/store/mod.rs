mod db;
#[cfg(test)]
mod tests;

use std::{fs, path::Path, sync::Mutex};

use rusqlite::Connection;

/// SQLite-backed leaderboard.
///
/// One table, append-only: every accepted submission becomes a row and reads
/// rank by score. Rows carry a creation timestamp so equal scores list oldest first.
pub struct ScoreStore {
    conn: Mutex<Connection>,
}

impl ScoreStore {
    /// Open (or create) `{data_dir}/scores.db` and make sure the schema exists.
    pub fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("scores.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        Self::create_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        let stored = store.count()?;
        tracing::info!(path = %db_path.display(), stored, "score store ready");
        Ok(store)
    }

    fn create_schema(conn: &Connection) -> Result<(), String> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name TEXT NOT NULL,
                score       INTEGER NOT NULL CHECK (score >= 0),
                created_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scores_score ON scores(score DESC);",
        )
        .map_err(|e| format!("failed to create schema: {e}"))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, String> {
        self.conn
            .lock()
            .map_err(|_| "score store mutex poisoned".to_string())
    }
}
