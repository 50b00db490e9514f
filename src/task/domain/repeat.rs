//! Stored recurrence rules.
//!
//! Rules are recorded as data only; nothing expands them into occurrences.

use super::ParseRepeatKindError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a task repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatKind {
    /// The task does not repeat.
    #[default]
    None,
    /// Repeats every `interval` days.
    Daily,
    /// Repeats every `interval` weeks.
    Weekly,
    /// Repeats every `interval` months.
    Monthly,
    /// Repeats every `interval` years.
    Yearly,
}

impl RepeatKind {
    /// Every repeat kind.
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Returns the canonical names of all repeat kinds.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|kind| kind.as_str()).collect()
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RepeatKind {
    type Error = ParseRepeatKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ParseRepeatKindError(value.to_owned())),
        }
    }
}

/// Recurrence rule attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    #[serde(rename = "type")]
    kind: RepeatKind,
    interval: u32,
    end_date: Option<DateTime<Utc>>,
}

impl RepeatRule {
    /// Creates a rule. `interval` must already be validated as at least one.
    #[must_use]
    pub const fn new(kind: RepeatKind, interval: u32, end_date: Option<DateTime<Utc>>) -> Self {
        Self {
            kind,
            interval,
            end_date,
        }
    }

    /// Returns the repeat kind.
    #[must_use]
    pub const fn kind(&self) -> RepeatKind {
        self.kind
    }

    /// Returns the repeat interval.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    /// Returns the optional end of the recurrence.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }
}

impl Default for RepeatRule {
    fn default() -> Self {
        Self::new(RepeatKind::None, 1, None)
    }
}
