//! Successor synthesis for recurring tasks.
//!
//! Pure logic: the store decides when to call this and whether the result can
//! be inserted. The synthesized task goes through the same validation as any
//! other, so a successor whose shifted deadline already passed is rejected
//! here rather than stored half-valid.

use chrono::{DateTime, Duration, Local};

use super::task::{Task, ValidationError};

/// Marker appended to a recurring task's title for its first successor.
const RECURRING_MARKER: &str = " (Recurring)";

/// Build the successor of a just-completed recurring task.
///
/// The successor copies priority, dependencies, and recurrence settings
/// verbatim; its deadline is the original's shifted by the recurrence
/// interval (or absent if the original had none), and its title is the
/// original's root title with the first free recurrence marker, as judged by
/// `title_taken`.
///
/// # Errors
/// Returns [`ValidationError::MissingInterval`] if the task is not actually
/// recurring, or whatever rule the synthesized task violates (typically a
/// shifted deadline that is no longer in the future).
pub(crate) fn successor(
    original: &Task,
    title_taken: impl Fn(&str) -> bool,
    now: DateTime<Local>,
) -> Result<Task, ValidationError> {
    let Some(interval) = original.recurrence_interval() else {
        return Err(ValidationError::MissingInterval);
    };

    let title = next_title(root_title(original.title()), &title_taken);
    let deadline = original
        .deadline()
        .map(|deadline| deadline + Duration::days(i64::from(interval)));

    Task::with_created_at(
        title,
        original.priority(),
        deadline,
        original.dependencies().to_vec(),
        true,
        Some(interval),
        now,
    )
}

/// Strip a trailing recurrence marker, so repeated cycles derive from the
/// original title instead of stacking markers.
fn root_title(title: &str) -> &str {
    if let Some(stem) = title.strip_suffix(RECURRING_MARKER) {
        return stem;
    }
    if let Some((stem, rest)) = title.rsplit_once(" (Recurring #") {
        if let Some(digits) = rest.strip_suffix(')') {
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                return stem;
            }
        }
    }
    title
}

/// First unoccupied title in the sequence
/// `"{root} (Recurring)"`, `"{root} (Recurring #2)"`, `"{root} (Recurring #3)"`, ...
fn next_title(root: &str, title_taken: &impl Fn(&str) -> bool) -> String {
    let first = format!("{root}{RECURRING_MARKER}");
    if !title_taken(&first) {
        return first;
    }
    let mut cycle: u64 = 2;
    loop {
        let candidate = format!("{root} (Recurring #{cycle})");
        if !title_taken(&candidate) {
            return candidate;
        }
        cycle += 1;
    }
}
