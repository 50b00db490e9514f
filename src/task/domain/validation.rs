//! Field-level validation rules for task input.
//!
//! Each rule normalises one raw caller value or reports a
//! [`FieldViolation`]. Drafts and patches compose these rules so every
//! mutating operation checks input the same way before anything is stored.

use super::{FieldViolation, RepeatKind, RepeatRule, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
/// Maximum category length in characters.
pub const CATEGORY_MAX_CHARS: usize = 50;
/// Maximum length of a single tag in characters.
pub const TAG_MAX_CHARS: usize = 20;
/// Largest accepted progress value.
pub const PROGRESS_MAX: u8 = 100;

fn within_limit(
    field: &str,
    value: &str,
    max_chars: usize,
) -> Result<String, FieldViolation> {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_chars {
        return Err(FieldViolation::new(
            field,
            format!("{field} must not exceed {max_chars} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Trims and checks a title.
///
/// # Errors
///
/// Fails when the title is blank or longer than [`TITLE_MAX_CHARS`].
pub fn title(value: &str) -> Result<String, FieldViolation> {
    if value.trim().is_empty() {
        return Err(FieldViolation::new("title", "title is required"));
    }
    within_limit("title", value, TITLE_MAX_CHARS)
}

/// Trims and checks a description.
///
/// # Errors
///
/// Fails when longer than [`DESCRIPTION_MAX_CHARS`].
pub fn description(value: &str) -> Result<String, FieldViolation> {
    within_limit("description", value, DESCRIPTION_MAX_CHARS)
}

/// Trims and checks a category.
///
/// # Errors
///
/// Fails when longer than [`CATEGORY_MAX_CHARS`].
pub fn category(value: &str) -> Result<String, FieldViolation> {
    within_limit("category", value, CATEGORY_MAX_CHARS)
}

/// Trims tags, dropping blank entries and keeping order and duplicates.
///
/// # Errors
///
/// Fails when any tag is longer than [`TAG_MAX_CHARS`].
pub fn tags(values: &[String]) -> Result<Vec<String>, FieldViolation> {
    values
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(|tag| within_limit("tags", tag, TAG_MAX_CHARS))
        .collect()
}

/// Parses a priority name.
///
/// # Errors
///
/// Fails with a message listing the valid priorities.
pub fn priority(value: &str) -> Result<TaskPriority, FieldViolation> {
    TaskPriority::try_from(value).map_err(|_| {
        FieldViolation::new(
            "priority",
            format!(
                "priority must be one of {}",
                TaskPriority::names().join(", ")
            ),
        )
    })
}

/// Parses a status name.
///
/// # Errors
///
/// Fails with a message listing the valid statuses.
pub fn status(value: &str) -> Result<TaskStatus, FieldViolation> {
    TaskStatus::try_from(value).map_err(|_| {
        FieldViolation::new(
            "status",
            format!("status must be one of {}", TaskStatus::names().join(", ")),
        )
    })
}

/// Checks that progress lies in `0..=100`.
///
/// # Errors
///
/// Fails for values outside the range; nothing is clamped here.
pub fn progress(value: i64) -> Result<u8, FieldViolation> {
    u8::try_from(value)
        .ok()
        .filter(|progress| *progress <= PROGRESS_MAX)
        .ok_or_else(|| FieldViolation::new("progress", "progress must be between 0 and 100"))
}

/// Clamps any integer into `0..=100`.
#[must_use]
pub fn clamp_progress(value: i64) -> u8 {
    let clamped = value.clamp(0, i64::from(PROGRESS_MAX));
    u8::try_from(clamped).unwrap_or(PROGRESS_MAX)
}

/// Builds a repeat rule from raw parts, applying the `none`/`1` defaults.
///
/// # Errors
///
/// Fails when the kind is unknown or the interval is below one.
pub fn repeat(
    kind: Option<&str>,
    interval: Option<i64>,
    end_date: Option<DateTime<Utc>>,
) -> Result<RepeatRule, FieldViolation> {
    let parsed_kind = match kind {
        Some(raw) => RepeatKind::try_from(raw).map_err(|_| {
            FieldViolation::new(
                "repeat.type",
                format!("repeat type must be one of {}", RepeatKind::names().join(", ")),
            )
        })?,
        None => RepeatKind::None,
    };
    let parsed_interval = match interval {
        Some(raw) => u32::try_from(raw)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or_else(|| {
                FieldViolation::new("repeat.interval", "repeat interval must be at least 1")
            })?,
        None => 1,
    };
    Ok(RepeatRule::new(parsed_kind, parsed_interval, end_date))
}

/// Checks that a due date is not before the start of the current day.
///
/// # Errors
///
/// Fails when `value` precedes `start_of_today`.
pub fn due_date(
    value: DateTime<Utc>,
    start_of_today: DateTime<Utc>,
) -> Result<DateTime<Utc>, FieldViolation> {
    if value < start_of_today {
        return Err(FieldViolation::new(
            "dueDate",
            "due date must be today or later",
        ));
    }
    Ok(value)
}
