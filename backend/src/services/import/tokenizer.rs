//! Line-oriented CSV tokenizer for scorecard exports.
//!
//! The text is split into lines first (blank lines dropped, every line
//! trimmed) and each line is then handed to the `csv` reader on its own, so a
//! quoted field can hold commas and `""` escapes but never a line break.
//! Whitespace before an opening quote is ignored.

use crate::error::ImportError;
use csv::{ReaderBuilder, StringRecord, Terminator};
use log::debug;
use std::collections::HashMap;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One data row keyed by header text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    values: HashMap<String, String>,
}

impl CsvRow {
    /// Value under `header`, or `""` when the row has no such column.
    pub fn get(&self, header: &str) -> &str {
        self.values.get(header).map(String::as_str).unwrap_or("")
    }

    /// First non-empty value among `headers`, tried in order.
    pub fn first_filled(&self, headers: &[&str]) -> Option<&str> {
        headers
            .iter()
            .map(|header| self.get(header))
            .find(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawCsvTable {
    /// Header cells in column order. Duplicates are kept.
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
}

/// Splits `text` into a header row and keyed data rows.
///
/// A header that appears twice keeps the value of its last column in every
/// row. Rows shorter than the header map the missing columns to `""`.
pub fn tokenize(text: &str) -> Result<RawCsvTable, ImportError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(ImportError::MalformedInput(
            "CSV appears to have no data rows".to_string(),
        ));
    }

    let headers: Vec<String> = split_line(lines[0])?
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect();

    let mut rows = Vec::with_capacity(lines.len() - 1);
    for line in &lines[1..] {
        let fields = split_line(line)?;
        let values = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let value = fields.get(i).map(|f| f.trim()).unwrap_or("");
                (header.clone(), value.to_string())
            })
            .collect();
        rows.push(CsvRow { values });
    }

    debug!(
        "Tokenized CSV: {} header cells, {} data rows",
        headers.len(),
        rows.len()
    );
    Ok(RawCsvTable { headers, rows })
}

fn split_line(line: &str) -> Result<StringRecord, ImportError> {
    let line = unindent_fields(line);
    // Lines are already split, so only `\n` may end a record; a stray `\r` is data.
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    reader
        .read_record(&mut record)
        .map_err(|e| ImportError::MalformedInput(e.to_string()))?;
    Ok(record)
}

/// Drops spaces and tabs at the start of each field outside quotes, so that
/// `a, "b, c"` opens a quoted span on the second field instead of splitting it.
fn unindent_fields(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut field_start = true;
    let mut quoted = false;

    while let Some(c) = chars.next() {
        if quoted {
            out.push(c);
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    out.push('"');
                } else {
                    quoted = false;
                }
            }
            continue;
        }
        match c {
            ' ' | '\t' if field_start => {}
            '"' if field_start => {
                quoted = true;
                field_start = false;
                out.push(c);
            }
            ',' => {
                field_start = true;
                out.push(c);
            }
            _ => {
                field_start = false;
                out.push(c);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_field_keeps_commas_and_escaped_quotes() {
        let table = tokenize("Course Name,Total\n\"Course, \"\"The Bend\"\"\",54\n").unwrap();
        assert_eq!(table.headers, vec!["Course Name", "Total"]);
        assert_eq!(table.rows[0].get("Course Name"), "Course, \"The Bend\"");
        assert_eq!(table.rows[0].get("Total"), "54");
    }

    #[test]
    fn quoted_field_after_space_stays_whole() {
        let table = tokenize("PlayerName,CourseName,Hole1\nAlice, \"Maple, Hill\",3\n").unwrap();
        assert_eq!(table.rows[0].get("CourseName"), "Maple, Hill");
        assert_eq!(table.rows[0].get("Hole1"), "3");
    }

    #[test]
    fn spaces_inside_quotes_are_kept_until_trim() {
        assert_eq!(unindent_fields("a,  \"b,  c\" , d"), "a,\"b,  c\" ,d");
        assert_eq!(unindent_fields("\"x \"\", y\",z"), "\"x \"\", y\",z");
    }

    #[test]
    fn lone_carriage_return_does_not_end_the_row() {
        let table = tokenize("A,B\nx\ry,z\n").unwrap();
        assert_eq!(table.rows[0].get("A"), "x\ry");
        assert_eq!(table.rows[0].get("B"), "z");
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let text = "PlayerName,Hole1\r\n\r\n   \r\nPar,3\r\nAlice,4\r\n\r\n";
        let table = tokenize(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].get("PlayerName"), "Alice");
        assert_eq!(table.rows[1].get("Hole1"), "4");
    }

    #[test]
    fn header_only_is_malformed() {
        let err = tokenize("PlayerName,Hole1\n\n").unwrap_err();
        assert!(matches!(err, ImportError::MalformedInput(_)));
        assert!(matches!(tokenize(""), Err(ImportError::MalformedInput(_))));
    }

    #[test]
    fn missing_trailing_fields_are_empty_not_absent() {
        let table = tokenize("PlayerName,Hole1,Hole2\nAlice,3\n").unwrap();
        assert_eq!(table.rows[0].get("Hole2"), "");
        assert_eq!(table.rows[0].get("NoSuchColumn"), "");
    }

    #[test]
    fn values_and_headers_are_trimmed() {
        let table = tokenize(" PlayerName , Hole 1 \nAlice ,  3 \n").unwrap();
        assert_eq!(table.headers, vec!["PlayerName", "Hole 1"]);
        assert_eq!(table.rows[0].get("PlayerName"), "Alice");
        assert_eq!(table.rows[0].get("Hole 1"), "3");
    }

    #[test]
    fn leading_byte_order_mark_is_dropped() {
        let table = tokenize("\u{feff}PlayerName,Hole1\nAlice,3\n").unwrap();
        assert_eq!(table.headers[0], "PlayerName");
    }

    #[test]
    fn repeated_header_keeps_last_value() {
        let table = tokenize("Name,Name\nfirst,second\n").unwrap();
        assert_eq!(table.headers, vec!["Name", "Name"]);
        assert_eq!(table.rows[0].get("Name"), "second");
    }

    #[test]
    fn first_filled_skips_empty_candidates() {
        let table = tokenize("A,B,C\n,x,y\n").unwrap();
        let row = &table.rows[0];
        assert_eq!(row.first_filled(&["A", "B", "C"]), Some("x"));
        assert_eq!(row.first_filled(&["A", "Missing"]), None);
    }
}
