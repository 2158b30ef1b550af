use crate::db::Db;
use crate::error::AppError;
use crate::models::ranking::*;
use rusqlite::{params, OptionalExtension};

/// Number of entries returned by the ranking endpoint
pub const RANKING_LIMIT: i64 = 10;

pub fn fetch_top_rankings(db: &Db) -> Result<Vec<RankingEntry>, AppError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT nome, tempo FROM corrida_ranking ORDER BY tempo ASC, id ASC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![RANKING_LIMIT], |row| {
            Ok(RankingEntry {
                nome: row.get(0)?,
                tempo: row.get(1)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    })
    .map_err(AppError::storage(FETCH_FAILED_MESSAGE))
}

/// Stores `sub.tempo` as the player's best time unless their existing best is
/// already lower or equal.
pub fn submit_time(db: &Db, sub: &TimeSubmission) -> Result<SaveOutcome, AppError> {
    db.with_tx(|tx| {
        let existing: Option<f64> = tx
            .query_row(
                "SELECT tempo FROM corrida_ranking WHERE nome = ?1",
                params![sub.nome],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            None => {
                tx.execute(
                    "INSERT INTO corrida_ranking (nome, tempo) VALUES (?1, ?2)",
                    params![sub.nome, sub.tempo],
                )?;
                Ok(SaveOutcome::FirstRecord)
            }
            Some(best) if sub.tempo < best => {
                tx.execute(
                    "UPDATE corrida_ranking SET tempo = ?1 WHERE nome = ?2",
                    params![sub.tempo, sub.nome],
                )?;
                Ok(SaveOutcome::NewRecord)
            }
            Some(_) => Ok(SaveOutcome::NotBeaten),
        }
    })
    .map_err(AppError::storage(SAVE_FAILED_MESSAGE))
}
