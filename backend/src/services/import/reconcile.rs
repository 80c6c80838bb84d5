//! Picks the par row and the player's row out of a tokenized scorecard and
//! turns them into a round plus its per-hole results.

use super::columns::{ColumnMap, Field};
use super::tokenizer::{CsvRow, RawCsvTable};
use crate::error::ImportError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::debug;

/// Player-column value that marks the course's par row.
pub const PAR_ROW_NAME: &str = "par";

const UNKNOWN_PLAYER: &str = "Unknown player";
const UNKNOWN_COURSE: &str = "Unknown course";

/// Date-time layouts seen in scorecard exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledHole {
    /// Column position of the hole, 1-based. Not renumbered after drops.
    pub play_order: i32,
    pub label: String,
    pub par: Option<i32>,
    pub strokes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRound {
    pub player_name: String,
    pub course_name: String,
    pub layout_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_strokes: Option<i32>,
    pub score_vs_par: Option<i32>,
    pub round_rating: Option<f64>,
    /// Every hole column in the export, including ones without strokes.
    pub hole_count: usize,
    pub holes: Vec<ReconciledHole>,
}

/// Builds the round for `target_player`, or for the first real player when
/// no name is given.
///
/// Name comparison is ASCII case-insensitive. Unparsable dates and numbers
/// become `None`; a hole whose strokes cannot be read is left out.
pub fn reconcile(
    table: &RawCsvTable,
    columns: &ColumnMap,
    target_player: Option<&str>,
) -> Result<ReconciledRound, ImportError> {
    let player_header = columns.header(Field::Player);

    let par_row = table
        .rows
        .iter()
        .find(|row| row.get(player_header).eq_ignore_ascii_case(PAR_ROW_NAME));
    let player_row = select_player_row(table, player_header, target_player)?;

    let value = |field: Field| player_row.get(columns.header(field));

    let player_name = player_row
        .first_filled(&[player_header])
        .unwrap_or(UNKNOWN_PLAYER)
        .to_string();
    let course_name = player_row
        .first_filled(&[columns.header(Field::Course)])
        .unwrap_or(UNKNOWN_COURSE)
        .to_string();
    let layout_name = player_row
        .first_filled(&[columns.header(Field::Layout)])
        .map(str::to_string);

    let holes: Vec<ReconciledHole> = columns
        .hole_columns
        .iter()
        .enumerate()
        .filter_map(|(index, header)| {
            let strokes = parse_int(player_row.get(header))?;
            Some(ReconciledHole {
                play_order: index as i32 + 1,
                label: hole_label(header, index),
                par: par_row.and_then(|row| parse_int(row.get(header))),
                strokes,
            })
        })
        .collect();

    debug!(
        "Reconciled player '{}' ({} par row): {}/{} holes with strokes",
        player_name,
        if par_row.is_some() { "with" } else { "no" },
        holes.len(),
        columns.hole_columns.len()
    );

    Ok(ReconciledRound {
        player_name,
        course_name,
        layout_name,
        start_time: parse_timestamp(value(Field::StartTime)),
        end_time: parse_timestamp(value(Field::EndTime)),
        total_strokes: parse_int(value(Field::TotalStrokes)),
        score_vs_par: parse_int(value(Field::ScoreVsPar)),
        round_rating: parse_decimal(value(Field::RoundRating)),
        hole_count: columns.hole_columns.len(),
        holes,
    })
}

fn select_player_row<'a>(
    table: &'a RawCsvTable,
    player_header: &str,
    target_player: Option<&str>,
) -> Result<&'a CsvRow, ImportError> {
    let found = match target_player {
        Some(target) => table
            .rows
            .iter()
            .find(|row| row.get(player_header).eq_ignore_ascii_case(target)),
        None => table.rows.iter().find(|row| {
            let name = row.get(player_header);
            !name.is_empty() && !name.eq_ignore_ascii_case(PAR_ROW_NAME)
        }),
    };

    found.ok_or_else(|| ImportError::RowNotFound {
        player: target_player.map(str::to_string),
        player_header: player_header.to_string(),
        headers: table.headers.clone(),
    })
}

/// Header text minus a leading "hole", or the 1-based column index when
/// nothing is left: `"Hole 7"` -> `"7"`, `"Hole"` -> `"1"`.
fn hole_label(header: &str, index: usize) -> String {
    let trimmed = header.trim_start();
    let rest = match trimmed.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("hole") => &trimmed[4..],
        _ => trimmed,
    };
    let label = rest.trim();
    if label.is_empty() {
        (index + 1).to_string()
    } else {
        label.to_string()
    }
}

fn parse_int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i32>().ok()
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses an export timestamp; values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}
