//! Line codec for the item store file.
//!
//! One item per line, fields joined by [`DELIMITER`]. The schema version is
//! given by the field count alone: 10 fields is the legacy shape without a
//! category, 11 fields is the current shape.

use chrono::{NaiveDate, NaiveDateTime};

use super::super::domain::{Category, Item, ItemDetails, ItemId, ItemStatus};

pub const DELIMITER: &str = "||";

const LEGACY_FIELD_COUNT: usize = 10;
const CURRENT_FIELD_COUNT: usize = 11;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_TIME_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// On-disk record layouts, distinguished by field count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    /// id, name, description, date_found, location, contact, value,
    /// perishable, status, created_at
    Legacy,
    /// Legacy layout with category inserted after description.
    Current,
}

impl RecordShape {
    fn from_field_count(count: usize) -> Option<Self> {
        match count {
            LEGACY_FIELD_COUNT => Some(RecordShape::Legacy),
            CURRENT_FIELD_COUNT => Some(RecordShape::Current),
            _ => None,
        }
    }
}

/// Item decoded from a line, with the shape it was stored in.
#[derive(Debug)]
pub struct DecodedRecord {
    pub item: Item,
    pub shape: RecordShape,
    /// Set when a current-shape record named a category outside the closed set.
    pub unknown_category: Option<String>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    #[error("expected 10 or 11 fields, found {0}")]
    FieldCount(usize),
    #[error("record has an empty id")]
    EmptyId,
    #[error("invalid {field} '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid estimated value '{0}'")]
    InvalidValue(String),
    #[error("invalid status '{0}'")]
    InvalidStatus(String),
}

/// Render an item in the current shape.
pub fn encode(item: &Item) -> String {
    let details = item.details();
    let fields = [
        sanitize(item.id().as_str()),
        sanitize(&details.name),
        sanitize(&details.description),
        details.category.label().to_string(),
        details.date_found.format(DATE_FORMAT).to_string(),
        sanitize(&details.location),
        sanitize(&details.contact),
        details.estimated_value.to_string(),
        details.perishable.to_string(),
        item.status().label().to_string(),
        item.created_at().format(DATE_TIME_FORMAT).to_string(),
    ];
    fields.join(DELIMITER)
}

/// Parse one line in either supported shape.
pub fn decode(line: &str) -> Result<DecodedRecord, RecordError> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    let shape =
        RecordShape::from_field_count(parts.len()).ok_or(RecordError::FieldCount(parts.len()))?;

    let (head, category, tail) = match shape {
        RecordShape::Current => (&parts[..3], Some(parts[3]), &parts[4..]),
        RecordShape::Legacy => (&parts[..3], None, &parts[3..]),
    };

    let id = head[0].trim();
    if id.is_empty() {
        return Err(RecordError::EmptyId);
    }

    let (category, unknown_category) = match category {
        Some(raw) => match Category::parse(raw) {
            Some(category) => (category, None),
            None => (Category::Others, Some(raw.to_string())),
        },
        None => (Category::Others, None),
    };

    let date_found = NaiveDate::parse_from_str(tail[0].trim(), DATE_FORMAT).map_err(|_| {
        RecordError::InvalidDate {
            field: "date found",
            value: tail[0].to_string(),
        }
    })?;
    let estimated_value = parse_value(tail[3])?;
    let perishable = tail[4].trim().eq_ignore_ascii_case("true");
    let status =
        ItemStatus::parse(tail[5]).ok_or_else(|| RecordError::InvalidStatus(tail[5].to_string()))?;
    let created_at = parse_timestamp(tail[6]).ok_or_else(|| RecordError::InvalidDate {
        field: "created at",
        value: tail[6].to_string(),
    })?;

    let details = ItemDetails {
        name: head[1].to_string(),
        description: head[2].to_string(),
        category,
        date_found,
        location: tail[1].to_string(),
        contact: tail[2].to_string(),
        estimated_value,
        perishable,
    };

    Ok(DecodedRecord {
        item: Item::restore(ItemId(id.to_string()), details, status, created_at),
        shape,
        unknown_category,
    })
}

/// Blank out anything that would break the line-per-record layout.
pub fn sanitize(value: &str) -> String {
    let cleaned = value
        .replace(DELIMITER, " ")
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ");

    let last = cleaned.chars().count().saturating_sub(1);
    cleaned
        .chars()
        .enumerate()
        .map(|(idx, c)| {
            if c == '|' && (idx == 0 || idx == last) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn parse_value(raw: &str) -> Result<f64, RecordError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(RecordError::InvalidValue(raw.to_string())),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, DATE_TIME_MINUTES_FORMAT))
        .ok()
}
