use super::init_schema;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use common::model::round::{HoleResult, Round, RoundSource};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// A round about to be written. Id and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRound {
    pub user_id: String,
    pub course_name: String,
    pub layout_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_strokes: Option<i32>,
    pub score_vs_par: Option<i32>,
    pub round_rating: Option<f64>,
    pub holes_count: Option<i32>,
    pub source: RoundSource,
    pub source_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHoleResult {
    pub round_id: String,
    pub play_order: i32,
    pub hole_label: String,
    pub par: Option<i32>,
    pub strokes: i32,
    pub ob: bool,
    pub notes: String,
}

/// Persistence operations the HTTP services depend on.
///
/// `insert_round` and `insert_hole_results` are separate calls
/// with no transaction spanning them: an import keeps its round even when the
/// hole batch is rejected.
pub trait RoundStore: Send + Sync {
    fn insert_round(&self, round: &NewRound) -> Result<Round, StoreError>;

    /// Writes the whole batch or nothing.
    fn insert_hole_results(&self, holes: &[NewHoleResult]) -> Result<Vec<HoleResult>, StoreError>;

    /// Rounds for `user_id`, newest start time first.
    fn list_rounds(&self, user_id: &str) -> Result<Vec<Round>, StoreError>;

    fn list_hole_results(&self, round_id: &str) -> Result<Vec<HoleResult>, StoreError>;
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }
}

const ROUND_COLUMNS: &str = "id, user_id, course_name, layout_name, start_time, end_time, \
     total_strokes, score_vs_par, round_rating, holes_count, source, source_ref, created_at";

const HOLE_COLUMNS: &str = "id, round_id, play_order, hole_label, par, strokes, ob, notes";

fn round_from_row(row: &Row<'_>) -> rusqlite::Result<Round> {
    let source: String = row.get(10)?;
    let source = RoundSource::parse(&source).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            10,
            Type::Text,
            format!("unknown round source '{}'", source).into(),
        )
    })?;
    Ok(Round {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_name: row.get(2)?,
        layout_name: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        total_strokes: row.get(6)?,
        score_vs_par: row.get(7)?,
        round_rating: row.get(8)?,
        holes_count: row.get(9)?,
        source,
        source_ref: row.get(11)?,
        created_at: row.get(12)?,
    })
}

fn hole_from_row(row: &Row<'_>) -> rusqlite::Result<HoleResult> {
    Ok(HoleResult {
        id: row.get(0)?,
        round_id: row.get(1)?,
        play_order: row.get(2)?,
        hole_label: row.get(3)?,
        par: row.get(4)?,
        strokes: row.get(5)?,
        ob: row.get(6)?,
        notes: row.get(7)?,
    })
}

impl RoundStore for SqliteStore {
    fn insert_round(&self, round: &NewRound) -> Result<Round, StoreError> {
        let stored = Round {
            id: Uuid::new_v4().to_string(),
            user_id: round.user_id.clone(),
            course_name: round.course_name.clone(),
            layout_name: round.layout_name.clone(),
            start_time: round.start_time,
            end_time: round.end_time,
            total_strokes: round.total_strokes,
            score_vs_par: round.score_vs_par,
            round_rating: round.round_rating,
            holes_count: round.holes_count,
            source: round.source,
            source_ref: round.source_ref.clone(),
            created_at: Utc::now(),
        };

        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO rounds ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                ROUND_COLUMNS
            ),
            params![
                stored.id,
                stored.user_id,
                stored.course_name,
                stored.layout_name,
                stored.start_time,
                stored.end_time,
                stored.total_strokes,
                stored.score_vs_par,
                stored.round_rating,
                stored.holes_count,
                stored.source.as_str(),
                stored.source_ref,
                stored.created_at,
            ],
        )?;

        Ok(stored)
    }

    fn insert_hole_results(&self, holes: &[NewHoleResult]) -> Result<Vec<HoleResult>, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut stored = Vec::with_capacity(holes.len());
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO round_hole_results ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                HOLE_COLUMNS
            ))?;
            for hole in holes {
                let result = HoleResult {
                    id: Uuid::new_v4().to_string(),
                    round_id: hole.round_id.clone(),
                    play_order: hole.play_order,
                    hole_label: hole.hole_label.clone(),
                    par: hole.par,
                    strokes: hole.strokes,
                    ob: hole.ob,
                    notes: hole.notes.clone(),
                };
                stmt.execute(params![
                    result.id,
                    result.round_id,
                    result.play_order,
                    result.hole_label,
                    result.par,
                    result.strokes,
                    result.ob,
                    result.notes,
                ])?;
                stored.push(result);
            }
        }
        tx.commit()?;
        Ok(stored)
    }

    fn list_rounds(&self, user_id: &str) -> Result<Vec<Round>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM rounds WHERE user_id = ?1 ORDER BY start_time DESC NULLS FIRST, created_at DESC",
            ROUND_COLUMNS
        ))?;
        let rounds = stmt
            .query_map(params![user_id], round_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rounds)
    }

    fn list_hole_results(&self, round_id: &str) -> Result<Vec<HoleResult>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM round_hole_results WHERE round_id = ?1 ORDER BY play_order",
            HOLE_COLUMNS
        ))?;
        let holes = stmt
            .query_map(params![round_id], hole_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(holes)
    }
}
