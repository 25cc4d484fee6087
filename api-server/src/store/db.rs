use rusqlite::params;

use super::*;
use crate::types::ScoreEntry;

impl ScoreStore {
    /// Insert one score row and return its id. `player_name` and `score` must
    /// already be sanitized.
    pub fn insert(&self, player_name: &str, score: i64, created_at: u64) -> Result<i64, String> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO scores (player_name, score, created_at) VALUES (?1, ?2, ?3)",
            params![player_name, score, created_at as i64],
        )
        .map_err(|e| format!("insert score failed: {e}"))?;
        Ok(conn.last_insert_rowid())
    }

    /// Highest scores first; ties go to the earlier submission.
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, String> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, player_name, score FROM scores
                 ORDER BY score DESC, id ASC
                 LIMIT ?1",
            )
            .map_err(|e| format!("prepare top scores failed: {e}"))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ScoreEntry {
                    id: row.get(0)?,
                    player_name: row.get(1)?,
                    score: row.get(2)?,
                })
            })
            .map_err(|e| format!("query top scores failed: {e}"))?;

        let mut entries = Vec::with_capacity(limit);
        for row in rows {
            entries.push(row.map_err(|e| format!("failed to read score row: {e}"))?);
        }
        Ok(entries)
    }

    pub fn count(&self) -> Result<u64, String> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM scores", [], |row| row.get(0))
            .map_err(|e| format!("count scores failed: {e}"))?;
        Ok(count.max(0) as u64)
    }
}
