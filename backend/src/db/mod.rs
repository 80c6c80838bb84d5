//! SQLite persistence for rounds and their hole results.
//!
//! The schema is created on open, so a fresh file (or an in-memory database
//! in tests) is usable immediately.

mod store;

pub use store::{NewHoleResult, NewRound, RoundStore, SqliteStore};

use rusqlite::Connection;

pub(crate) fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS rounds(
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            course_name TEXT NOT NULL,
            layout_name TEXT,
            start_time TEXT,
            end_time TEXT,
            total_strokes INTEGER,
            score_vs_par INTEGER,
            round_rating REAL,
            holes_count INTEGER,
            source TEXT NOT NULL,
            source_ref TEXT,
            created_at TEXT NOT NULL
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_rounds_user ON rounds(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS round_hole_results(
            id TEXT PRIMARY KEY,
            round_id TEXT NOT NULL,
            play_order INTEGER NOT NULL,
            hole_label TEXT NOT NULL,
            par INTEGER,
            strokes INTEGER NOT NULL,
            ob INTEGER NOT NULL DEFAULT 0,
            notes TEXT NOT NULL DEFAULT '',
            FOREIGN KEY(round_id) REFERENCES rounds(id) ON DELETE CASCADE
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_hole_results_round ON round_hole_results(round_id, play_order)",
        [],
    )?;

    Ok(())
}
