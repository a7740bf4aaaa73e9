//! Chat import rules.
//!
//! The uploaded sheet is decoded elsewhere; this module receives its rows as
//! loosely-typed records and decides which ones are importable.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::chat::{NewChatMessage, Sender};

/// One row as read from the sheet. Every column may be missing, and a cell
/// may hold whatever type the sheet reader produced for it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatImportRow {
    #[serde(default)]
    pub message: Value,
    #[serde(default)]
    pub timestamp: Value,
    #[serde(default)]
    pub sender: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("No valid chat data found")]
    NoValidRows,
}

/// Rows that passed validation plus a count of those that did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    pub messages: Vec<NewChatMessage>,
    pub skipped: usize,
}

/// Keep rows with a non-blank message, a parseable timestamp and a sender of
/// `user` or `system`. Fails if nothing survives.
pub fn validate_rows(rows: &[ChatImportRow]) -> Result<ImportBatch, ImportError> {
    let mut messages = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.iter().enumerate() {
        match validate_row(row) {
            Some(message) => messages.push(message),
            None => {
                warn!(row = index, "skipping invalid chat import row");
                skipped += 1;
            }
        }
    }

    if messages.is_empty() {
        return Err(ImportError::NoValidRows);
    }
    Ok(ImportBatch { messages, skipped })
}

fn validate_row(row: &ChatImportRow) -> Option<NewChatMessage> {
    let message = cell_text(&row.message)?;
    let timestamp = parse_timestamp(row.timestamp.as_str()?)?;
    let sender: Sender = row.sender.as_str()?.trim().parse().ok()?;
    Some(NewChatMessage {
        message,
        sender,
        timestamp,
    })
}

/// Text of a message cell. Numeric cells are kept as their decimal form.
fn cell_text(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` or a bare `YYYY-MM-DD`; the naive
/// forms are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}
