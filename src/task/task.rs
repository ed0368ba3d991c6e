//! Core Task type with construction-time validation.
//!
//! # Invariants
//! - `title` is 1..=100 characters
//! - `deadline`, when present, was strictly in the future at validation time
//! - `recurring` and `recurrence_interval` are covariant: both set or both absent
//! - `completed` transitions false -> true at most once, via the store

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        write!(f, "{label}")
    }
}

/// Longest permitted title.
pub const MAX_TITLE_LEN: usize = 100;

/// Largest permitted recurrence interval, in days.
pub const MAX_RECURRENCE_DAYS: u32 = 365;

/// A single trackable unit of work.
///
/// All fields are immutable after construction except `completed`, which the
/// store flips exactly once through [`Task::mark_completed`]. Validation
/// happens in the constructor; a `Task` value is always well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique title, the primary key within a store.
    title: String,

    priority: Priority,

    /// Optional due instant, local wall clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Local>>,

    /// Titles of tasks that should be completed before this one.
    /// Ordered, duplicates permitted; existence is checked by the store.
    #[serde(default)]
    dependencies: Vec<String>,

    recurring: bool,

    /// Days between recurrences, 1..=365. Present iff `recurring`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurrence_interval: Option<u32>,

    #[serde(default)]
    completed: bool,

    created_at: DateTime<Local>,
}

impl Task {
    /// Create a new task, stamped with the current wall-clock time.
    ///
    /// # Errors
    /// Returns the first violated rule, in order: title length, deadline in
    /// the future, recurrence covariance and interval range.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        deadline: Option<DateTime<Local>>,
        dependencies: Vec<String>,
        recurring: bool,
        recurrence_interval: Option<u32>,
    ) -> Result<Self, ValidationError> {
        Self::with_created_at(
            title,
            priority,
            deadline,
            dependencies,
            recurring,
            recurrence_interval,
            Local::now(),
        )
    }

    /// Like [`Task::new`], but validated against an explicit `now`.
    ///
    /// `now` becomes `created_at` and is the instant the deadline is compared
    /// against, so the boundary (`deadline == now` is invalid) is exact.
    pub(crate) fn with_created_at(
        title: impl Into<String>,
        priority: Priority,
        deadline: Option<DateTime<Local>>,
        dependencies: Vec<String>,
        recurring: bool,
        recurrence_interval: Option<u32>,
        now: DateTime<Local>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let len = title.chars().count();
        if len == 0 || len > MAX_TITLE_LEN {
            return Err(ValidationError::TitleLength(len));
        }

        if let Some(deadline) = deadline {
            if deadline <= now {
                return Err(ValidationError::DeadlineNotFuture { deadline });
            }
        }

        match (recurring, recurrence_interval) {
            (true, None) => return Err(ValidationError::MissingInterval),
            (true, Some(days)) if days == 0 || days > MAX_RECURRENCE_DAYS => {
                return Err(ValidationError::IntervalOutOfRange(days))
            }
            (false, Some(_)) => return Err(ValidationError::IntervalWithoutRecurring),
            _ => {}
        }

        Ok(Self {
            title,
            priority,
            deadline,
            dependencies,
            recurring,
            recurrence_interval,
            completed: false,
            created_at: now,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.deadline
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring
    }

    pub fn recurrence_interval(&self) -> Option<u32> {
        self.recurrence_interval
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Flip `completed` to true.
    ///
    /// The store's complete operation is the only caller and checks
    /// `is_completed()` first, so the flag transitions at most once.
    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}

/// A construction rule was violated. Never fatal; callers report the rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must be 1 to {MAX_TITLE_LEN} characters, got {0}")]
    TitleLength(usize),

    #[error("deadline {} is not in the future", .deadline.format("%Y-%m-%d %H:%M"))]
    DeadlineNotFuture { deadline: DateTime<Local> },

    #[error("recurring tasks require a recurrence interval")]
    MissingInterval,

    #[error("recurrence interval must be 1 to {MAX_RECURRENCE_DAYS} days, got {0}")]
    IntervalOutOfRange(u32),

    #[error("a recurrence interval is only valid for recurring tasks")]
    IntervalWithoutRecurring,
}
