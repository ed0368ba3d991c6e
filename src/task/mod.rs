//! Task module - the task model, its validation rules, and recurrence
//! synthesis.
//!
//! Pure domain logic lives here, separated from storage IO:
//! - validation happens once, at construction, and a `Task` value is always
//!   well-formed
//! - recurrence synthesis is a pure function over an already-completed task

pub mod task;

pub(crate) mod recurrence;

pub use task::{Priority, Task, ValidationError, MAX_RECURRENCE_DAYS, MAX_TITLE_LEN};
