use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a round came from.
///
/// Stored as text in the `rounds.source` column and serialized the same way
/// over the wire, so both sides must agree on the literal tags below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundSource {
    /// Entered by hand through `POST /api/rounds`.
    #[serde(rename = "manual")]
    Manual,
    /// Created from a UDisc scorecard export.
    #[serde(rename = "udisc-import")]
    UdiscImport,
}

impl RoundSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundSource::Manual => "manual",
            RoundSource::UdiscImport => "udisc-import",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "manual" => Some(RoundSource::Manual),
            "udisc-import" => Some(RoundSource::UdiscImport),
            _ => None,
        }
    }
}

/// One logged disc-golf outing, as persisted in the `rounds` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: String,
    pub user_id: String,
    pub course_name: String,
    pub layout_name: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_strokes: Option<i32>,
    pub score_vs_par: Option<i32>,
    pub round_rating: Option<f64>,
    /// Number of hole columns seen at import time, not the number of
    /// hole results actually stored.
    pub holes_count: Option<i32>,
    pub source: RoundSource,
    /// Original file name for imported rounds.
    pub source_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single hole's par/strokes pair within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleResult {
    pub id: String,
    pub round_id: String,
    /// 1-based column position in the source scorecard. Skipped holes leave gaps.
    pub play_order: i32,
    pub hole_label: String,
    pub par: Option<i32>,
    pub strokes: i32,
    pub ob: bool,
    pub notes: String,
}
