//! Input validation helpers
//!
//! Text length limits and checks shared by the create handlers. SQLite TEXT
//! has no built-in length enforcement.

use chrono::{NaiveDate, NaiveDateTime};
use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Person names
pub const MAX_NAME_LEN: usize = 200;

/// Feedback comments, special notes
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Stored format of reservation and order timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ── Text ────────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    let len = value.chars().count();
    if len > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({len} chars, max {max_len})"
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

// ── Identifiers ─────────────────────────────────────────────────────

/// Unwrap a required payload field
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::required_field(field))
}

pub fn validate_positive_id(id: i64, field: &str) -> Result<i64, AppError> {
    if id < 1 {
        return Err(AppError::validation(format!("{field} must be a positive integer"))
            .with_detail("field", field)
            .with_detail("value", id));
    }
    Ok(id)
}

/// Parse a path segment as a positive id
pub fn parse_id(raw: &str, field: &str) -> Result<i64, AppError> {
    let id = raw.trim().parse::<i64>().map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("{field} must be a positive integer"),
        )
        .with_detail("field", field)
    })?;
    validate_positive_id(id, field)
}

// ── Dates ───────────────────────────────────────────────────────────

/// Accepts `YYYY-MM-DD HH:MM[:SS]` and the HTML `datetime-local` form
/// `YYYY-MM-DDTHH:MM[:SS]`; returns [`DATETIME_FORMAT`]
pub fn normalize_datetime(value: &str, field: &str) -> Result<String, AppError> {
    const ACCEPTED: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let value = value.trim();
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("{field} must look like YYYY-MM-DD HH:MM:SS"),
            )
            .with_detail("field", field)
        })
}

pub fn validate_date(value: &str, field: &str) -> Result<(), AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| {
            AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be YYYY-MM-DD"))
                .with_detail("field", field)
        })
}
