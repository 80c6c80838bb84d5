//! Resolves which CSV header carries each logical scorecard field.
//!
//! Exporters do not agree on header spelling ("PlayerName", "Player Name",
//! "player"), so every field is described by an ordered list of matchers over
//! the normalized header text plus a literal fallback. Supporting another
//! dialect means adding matchers to `FIELD_RULES`, not new branches.

use common::model::import::ResolvedHeaders;
use log::debug;

/// Logical fields a round is built from. The discriminant indexes `FIELD_RULES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Player,
    Course,
    Layout,
    StartTime,
    EndTime,
    TotalStrokes,
    ScoreVsPar,
    RoundRating,
}

impl Field {
    pub const COUNT: usize = 8;
}

#[derive(Debug, Clone, Copy)]
enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
    Contains(&'static str),
}

impl Matcher {
    fn matches(&self, normalized: &str) -> bool {
        match self {
            Matcher::Exact(text) => normalized == *text,
            Matcher::Prefix(text) => normalized.starts_with(text),
            Matcher::Contains(text) => normalized.contains(text),
        }
    }
}

struct FieldRule {
    field: Field,
    /// Highest priority first.
    matchers: &'static [Matcher],
    fallback: &'static str,
}

static FIELD_RULES: [FieldRule; Field::COUNT] = [
    FieldRule {
        field: Field::Player,
        matchers: &[Matcher::Prefix("playername"), Matcher::Prefix("player")],
        fallback: "Player Name",
    },
    FieldRule {
        field: Field::Course,
        matchers: &[Matcher::Prefix("coursename")],
        fallback: "Course Name",
    },
    FieldRule {
        field: Field::Layout,
        matchers: &[Matcher::Prefix("layoutname")],
        fallback: "Layout Name",
    },
    FieldRule {
        field: Field::StartTime,
        matchers: &[Matcher::Prefix("startdate")],
        fallback: "Start Date",
    },
    FieldRule {
        field: Field::EndTime,
        matchers: &[Matcher::Prefix("enddate")],
        fallback: "End Date",
    },
    FieldRule {
        field: Field::TotalStrokes,
        matchers: &[Matcher::Exact("total")],
        fallback: "Total",
    },
    FieldRule {
        field: Field::ScoreVsPar,
        matchers: &[Matcher::Contains("+/-"), Matcher::Contains("scorevspar")],
        fallback: "+/-",
    },
    FieldRule {
        field: Field::RoundRating,
        matchers: &[Matcher::Prefix("roundrating")],
        fallback: "Round Rating",
    },
];

const HOLE_PREFIX: &str = "hole";

/// Header chosen for every logical field, plus the per-hole score columns.
///
/// A field with no matching header holds its fallback name, which may not be
/// a real column; row lookups against it simply come back empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    resolved: [String; Field::COUNT],
    pub hole_columns: Vec<String>,
}

impl ColumnMap {
    pub fn header(&self, field: Field) -> &str {
        &self.resolved[field as usize]
    }

    pub fn to_resolved_headers(&self) -> ResolvedHeaders {
        ResolvedHeaders {
            player_header: self.header(Field::Player).to_string(),
            course_header: self.header(Field::Course).to_string(),
            layout_header: self.header(Field::Layout).to_string(),
            start_header: self.header(Field::StartTime).to_string(),
            end_header: self.header(Field::EndTime).to_string(),
            total_header: self.header(Field::TotalStrokes).to_string(),
            score_header: self.header(Field::ScoreVsPar).to_string(),
            rating_header: self.header(Field::RoundRating).to_string(),
            hole_headers: self.hole_columns.clone(),
        }
    }
}

/// Lowercases and removes all whitespace: `"Player Name"` -> `"playername"`.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn resolve_columns(headers: &[String]) -> ColumnMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let resolve = |rule: &FieldRule| -> String {
        rule.matchers
            .iter()
            .find_map(|matcher| {
                normalized
                    .iter()
                    .position(|n| matcher.matches(n))
                    .map(|index| headers[index].clone())
            })
            .unwrap_or_else(|| rule.fallback.to_string())
    };

    let mut resolved: [String; Field::COUNT] = Default::default();
    for rule in FIELD_RULES.iter() {
        resolved[rule.field as usize] = resolve(rule);
    }

    let hole_columns: Vec<String> = headers
        .iter()
        .zip(&normalized)
        .filter(|(_, n)| n.starts_with(HOLE_PREFIX))
        .map(|(header, _)| header.clone())
        .collect();

    debug!(
        "Resolved columns: player='{}' course='{}' total='{}' score='{}', {} hole columns",
        resolved[Field::Player as usize],
        resolved[Field::Course as usize],
        resolved[Field::TotalStrokes as usize],
        resolved[Field::ScoreVsPar as usize],
        hole_columns.len()
    );

    ColumnMap {
        resolved,
        hole_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rule_table_is_indexed_by_field() {
        for (index, rule) in FIELD_RULES.iter().enumerate() {
            assert_eq!(rule.field as usize, index, "{:?} out of place", rule.field);
        }
    }

    #[test]
    fn resolves_udisc_export_headers() {
        let map = resolve_columns(&headers(&[
            "PlayerName",
            "CourseName",
            "LayoutName",
            "StartDate",
            "EndDate",
            "Total",
            "+/-",
            "RoundRating",
            "Hole1",
            "Hole2",
        ]));

        assert_eq!(map.header(Field::Player), "PlayerName");
        assert_eq!(map.header(Field::Course), "CourseName");
        assert_eq!(map.header(Field::Layout), "LayoutName");
        assert_eq!(map.header(Field::StartTime), "StartDate");
        assert_eq!(map.header(Field::EndTime), "EndDate");
        assert_eq!(map.header(Field::TotalStrokes), "Total");
        assert_eq!(map.header(Field::ScoreVsPar), "+/-");
        assert_eq!(map.header(Field::RoundRating), "RoundRating");
        assert_eq!(map.hole_columns, vec!["Hole1", "Hole2"]);
    }

    #[test]
    fn matching_ignores_case_and_spacing() {
        let map = resolve_columns(&headers(&["player name", "Course  Name", "HOLE 1"]));
        assert_eq!(map.header(Field::Player), "player name");
        assert_eq!(map.header(Field::Course), "Course  Name");
        assert_eq!(map.hole_columns, vec!["HOLE 1"]);
    }

    #[test]
    fn higher_priority_matcher_beats_earlier_column() {
        // "Player" appears first but only satisfies the weaker prefix.
        let map = resolve_columns(&headers(&["Player", "Player Name"]));
        assert_eq!(map.header(Field::Player), "Player Name");

        let map = resolve_columns(&headers(&["Player", "Hole1"]));
        assert_eq!(map.header(Field::Player), "Player");
    }

    #[test]
    fn total_requires_exact_match() {
        let map = resolve_columns(&headers(&["Total Strokes", "Hole1"]));
        assert_eq!(map.header(Field::TotalStrokes), "Total");
    }

    #[test]
    fn missing_fields_fall_back_to_literal_names() {
        let map = resolve_columns(&headers(&["Hole1"]));
        assert_eq!(map.header(Field::Player), "Player Name");
        assert_eq!(map.header(Field::Course), "Course Name");
        assert_eq!(map.header(Field::Layout), "Layout Name");
        assert_eq!(map.header(Field::StartTime), "Start Date");
        assert_eq!(map.header(Field::EndTime), "End Date");
        assert_eq!(map.header(Field::TotalStrokes), "Total");
        assert_eq!(map.header(Field::ScoreVsPar), "+/-");
        assert_eq!(map.header(Field::RoundRating), "Round Rating");
    }

    #[test]
    fn fallback_header_looks_up_empty() {
        let table = super::super::tokenizer::tokenize("PlayerName,Hole1\nAlice,3\n").unwrap();
        let map = resolve_columns(&table.headers);
        assert_eq!(map.header(Field::TotalStrokes), "Total");
        assert_eq!(table.rows[0].get(map.header(Field::TotalStrokes)), "");
    }

    #[test]
    fn score_vs_par_matches_by_substring() {
        let map = resolve_columns(&headers(&["Score (+/-)", "Hole1"]));
        assert_eq!(map.header(Field::ScoreVsPar), "Score (+/-)");

        let map = resolve_columns(&headers(&["Score vs Par", "Hole1"]));
        assert_eq!(map.header(Field::ScoreVsPar), "Score vs Par");
    }

    #[test]
    fn no_hole_columns_resolves_empty_list() {
        let map = resolve_columns(&headers(&["PlayerName", "Total"]));
        assert!(map.hole_columns.is_empty());
    }

    #[test]
    fn resolved_headers_mirror_the_map() {
        let map = resolve_columns(&headers(&["PlayerName", "Hole1", "Hole2"]));
        let debug = map.to_resolved_headers();
        assert_eq!(debug.player_header, "PlayerName");
        assert_eq!(debug.total_header, "Total");
        assert_eq!(debug.hole_headers, vec!["Hole1", "Hole2"]);
    }
}
