use crate::model::round::Round;
use serde::{Deserialize, Serialize};

/// Header names the importer settled on for each logical field.
///
/// Returned with every successful import so a caller can see why a column
/// was (or was not) picked up from a particular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHeaders {
    pub player_header: String,
    pub course_header: String,
    pub layout_header: String,
    pub start_header: String,
    pub end_header: String,
    pub total_header: String,
    pub score_header: String,
    pub rating_header: String,
    pub hole_headers: Vec<String>,
}

/// Body of a successful `POST /api/import/udisc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub ok: bool,
    pub round: Round,
    pub holes_inserted: usize,
    pub player_name: String,
    pub debug: ResolvedHeaders,
}
