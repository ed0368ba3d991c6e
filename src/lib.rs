//! # taskdeck
//!
//! Personal task tracker: create tasks with priority, deadline, dependencies,
//! and recurrence; list, view, and complete them; persist everything to a
//! JSON file between invocations.
//!
//! ## Flow
//! Each invocation is one synchronous pass: parse a command, load the store,
//! execute one operation, rewrite the file, exit. The backing file is the
//! only shared state; there is no locking, so concurrent invocations can race.
//!
//! ## Modules
//! - `task`: the task model, validation rules, and recurrence synthesis
//! - `store`: the persistent title -> task mapping, with file and in-memory
//!   backends behind one trait
//! - `cli`: command definitions, rendering, and dependency gating
//! - `config`: environment-driven configuration

pub mod cli;
pub mod config;
pub mod store;
pub mod task;

pub use config::Config;
pub use store::{
    Completion, FileTaskStore, InMemoryTaskStore, RecurrenceWarning, StoreError, TaskStore,
};
pub use task::{Priority, Task, ValidationError};
