//! CSV interaction parsing.
//!
//! Accepted layout:
//!
//! ```text
//! user_id,item_id,rating
//! alice,matrix,5
//! bob,"heat, the",4.5
//! ```
//!
//! - Column order is free and unknown columns are ignored; a repeated
//!   column name resolves to its last occurrence.
//! - `rating` may be omitted entirely, in which case every row counts as `1.0`.
//! - An empty rating cell counts as `1.0`; an unparseable or non-finite one as `0.0`.
//! - Quoted fields may contain commas and `""` escapes but not line breaks.

use crate::error::{CoreError, Result};
use crate::Interaction;
use std::io::{BufRead, BufReader, Read};

/// Header name of the user column.
pub const USER_COLUMN: &str = "user_id";
/// Header name of the item column.
pub const ITEM_COLUMN: &str = "item_id";
/// Header name of the optional rating column.
pub const RATING_COLUMN: &str = "rating";

/// Rating used when the column or cell is absent.
pub const IMPLICIT_RATING: f64 = 1.0;

/// Rating used when a cell cannot be read as a finite number.
pub const COERCED_RATING: f64 = 0.0;

const UTF8_BOM: char = '\u{feff}';

// =============================================================================
// PUBLIC ENTRY POINTS
// =============================================================================

/// Parse interactions from any reader.
///
/// Interactions are returned in input order.
pub fn parse_interactions<R: Read>(reader: R) -> Result<Vec<Interaction>> {
    let mut lines = BufReader::new(reader).lines();
    let mut line_no = 0usize;

    let columns = loop {
        let Some(line) = lines.next() else {
            return Err(CoreError::EmptyInput);
        };
        let line = line?;
        line_no = line_no.saturating_add(1);
        let line = line.trim_start_matches(UTF8_BOM);
        if is_blank(line) {
            continue;
        }
        break Columns::from_header(&split_fields(line, line_no)?)?;
    };

    let mut interactions = Vec::new();
    for line in lines {
        let line = line?;
        line_no = line_no.saturating_add(1);
        if is_blank(&line) {
            continue;
        }
        let fields = split_fields(&line, line_no)?;
        interactions.push(columns.interaction(&fields, line_no)?);
    }

    Ok(interactions)
}

/// Parse interactions from an in-memory string.
pub fn parse_interactions_str(input: &str) -> Result<Vec<Interaction>> {
    parse_interactions(input.as_bytes())
}

// =============================================================================
// HEADER
// =============================================================================

/// Field positions resolved from the header line.
#[derive(Debug, Clone, Copy)]
struct Columns {
    user: usize,
    item: usize,
    rating: Option<usize>,
}

impl Columns {
    fn from_header(names: &[String]) -> Result<Self> {
        // a repeated header name resolves to its last occurrence
        let position = |wanted: &str| names.iter().rposition(|n| n.trim() == wanted);

        let user = position(USER_COLUMN);
        let item = position(ITEM_COLUMN);

        match (user, item) {
            (Some(user), Some(item)) => Ok(Self {
                user,
                item,
                rating: position(RATING_COLUMN),
            }),
            _ => {
                let mut missing = Vec::new();
                if item.is_none() {
                    missing.push(ITEM_COLUMN.to_string());
                }
                if user.is_none() {
                    missing.push(USER_COLUMN.to_string());
                }
                Err(CoreError::MissingColumns { missing })
            }
        }
    }

    fn interaction(&self, fields: &[String], line: usize) -> Result<Interaction> {
        let user = cell(fields, self.user);
        let item = cell(fields, self.item);
        if user.is_empty() || item.is_empty() {
            return Err(CoreError::MissingId { line });
        }

        let rating = match self.rating {
            Some(idx) => parse_rating(cell(fields, idx)),
            None => IMPLICIT_RATING,
        };

        Ok(Interaction::new(user, item, rating))
    }
}

/// Trimmed field at `idx`, or `""` when the row is short.
fn cell(fields: &[String], idx: usize) -> &str {
    fields.get(idx).map_or("", |f| f.trim())
}

/// Read a rating cell, coercing rather than failing.
fn parse_rating(raw: &str) -> f64 {
    if raw.is_empty() {
        return IMPLICIT_RATING;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => COERCED_RATING,
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// =============================================================================
// FIELD SPLITTING
// =============================================================================

/// Split one CSV line into raw (untrimmed) fields.
fn split_fields(line: &str, line_no: usize) -> Result<Vec<String>> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                continue;
            }
            '"' if at_field_start || field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            _ => field.push(c),
        }
        at_field_start = false;
    }

    if in_quotes {
        return Err(CoreError::Malformed {
            line: line_no,
            reason: "unterminated quoted field".to_string(),
        });
    }

    fields.push(field);
    Ok(fields)
}

// =============================================================================
// TESTS
// =============================================================================
