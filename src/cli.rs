//! Command-line surface: argument definitions, dispatch, and rendering.
//!
//! This is the presentation layer. It builds candidate tasks, gates `done` on
//! pending dependencies before calling the store, and turns store outcomes
//! into user-facing text. All failures surface as `anyhow` errors and a
//! failing exit status; none of them are fatal beyond that.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::store::{Completion, FileTaskStore, TaskStore};
use crate::task::{Priority, Task};

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Personal task tracker")]
pub struct Cli {
    /// Path to the task file (overrides TASKDECK_FILE)
    #[arg(long, value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title (unique)
        #[arg(short = 't', long)]
        title: String,

        /// Task priority
        #[arg(short = 'p', long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,

        /// Deadline: "2026-03-01 17:00", "2026-03-01", or an RFC 3339 timestamp
        #[arg(short = 'd', long)]
        deadline: Option<String>,

        /// Dependencies (comma-separated titles)
        #[arg(short = 'D', long = "deps", value_name = "TITLES")]
        deps: Option<String>,

        /// Recreate the task after each completion
        #[arg(short = 'r', long)]
        recurring: bool,

        /// Recurrence interval in days
        #[arg(short = 'i', long)]
        interval: Option<u32>,
    },

    /// List all tasks
    Ls,

    /// Mark a task as completed
    Done { title: String },

    /// View detailed information about a task
    View { title: String },
}

/// Open the store and execute one command against it.
pub fn run(cli: Cli, config: &Config) -> anyhow::Result<()> {
    let path = cli.file.unwrap_or_else(|| config.store_path.clone());
    let mut store = FileTaskStore::open(path)?;

    match cli.command {
        Command::Add {
            title,
            priority,
            deadline,
            deps,
            recurring,
            interval,
        } => add(&mut store, title, priority, deadline, deps, recurring, interval),
        Command::Ls => {
            list(&store);
            Ok(())
        }
        Command::Done { title } => done(&mut store, &title),
        Command::View { title } => view(&store, &title),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    store: &mut FileTaskStore,
    title: String,
    priority: Priority,
    deadline: Option<String>,
    deps: Option<String>,
    recurring: bool,
    interval: Option<u32>,
) -> anyhow::Result<()> {
    let deadline = deadline.as_deref().map(parse_deadline).transpose()?;
    let dependencies = split_deps(deps.as_deref());
    // An interval without --recurring is ignored rather than rejected.
    let interval = if recurring { interval } else { None };

    let task = Task::new(title, priority, deadline, dependencies, recurring, interval)?;
    let title = task.title().to_string();
    store.add(task)?;
    println!("Task '{title}' added.");
    Ok(())
}

fn done(store: &mut FileTaskStore, title: &str) -> anyhow::Result<()> {
    // Gate on dependencies here; the store itself completes unconditionally.
    let pending = store.pending_dependencies(title);
    if !pending.is_empty() {
        bail!(
            "cannot complete '{title}': pending dependencies: {}",
            pending.join(", ")
        );
    }

    match store.complete(title)? {
        Completion::Completed { successor, warning } => {
            println!("Task '{title}' marked as completed.");
            if let Some(next) = successor {
                println!("Recurring task '{next}' created.");
            }
            if let Some(warning) = warning {
                println!("Warning: could not create recurring task: {warning}");
            }
            Ok(())
        }
        Completion::AlreadyCompleted => {
            println!("Task '{title}' was already completed.");
            Ok(())
        }
    }
}

fn view(store: &FileTaskStore, title: &str) -> anyhow::Result<()> {
    let task = store
        .get(title)
        .ok_or_else(|| anyhow!("no task titled '{title}'"))?;

    println!("Title:               {}", task.title());
    println!("Priority:            {}", task.priority());
    println!("Deadline:            {}", deadline_cell(task));
    println!("Dependencies:        {}", dependencies_cell(task));
    println!("Status:              {}", status_cell(task));
    println!(
        "Recurring:           {}",
        if task.is_recurring() { "Yes" } else { "No" }
    );
    println!(
        "Recurrence Interval: {}",
        match task.recurrence_interval() {
            Some(days) => format!("{days} days"),
            None => "N/A".to_string(),
        }
    );
    println!(
        "Created At:          {}",
        task.created_at().format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn list(store: &FileTaskStore) {
    let tasks = store.list();
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    const HEADERS: [&str; 6] = [
        "Title",
        "Priority",
        "Deadline",
        "Dependencies",
        "Status",
        "Recurring",
    ];
    let rows: Vec<[String; 6]> = tasks.iter().map(|task| task_row(task)).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    print_row(&HEADERS.map(str::to_string), &widths);
    print_row(&widths.map(|w| "-".repeat(w)), &widths);
    for row in &rows {
        print_row(row, &widths);
    }
}

fn task_row(task: &Task) -> [String; 6] {
    [
        task.title().to_string(),
        task.priority().to_string(),
        deadline_cell(task),
        dependencies_cell(task),
        status_cell(task).to_string(),
        match task.recurrence_interval() {
            Some(days) => format!("Yes ({days} days)"),
            None => "No".to_string(),
        },
    ]
}

fn print_row(cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", line.trim_end());
}

fn deadline_cell(task: &Task) -> String {
    match task.deadline() {
        Some(deadline) => deadline.format("%Y-%m-%d %H:%M").to_string(),
        None => "No deadline".to_string(),
    }
}

fn dependencies_cell(task: &Task) -> String {
    if task.dependencies().is_empty() {
        "None".to_string()
    } else {
        task.dependencies().join(", ")
    }
}

fn status_cell(task: &Task) -> &'static str {
    if task.is_completed() {
        "Completed"
    } else {
        "Pending"
    }
}

fn split_deps(deps: Option<&str>) -> Vec<String> {
    deps.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|dep| !dep.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a deadline in any of the accepted formats into local time.
fn parse_deadline(input: &str) -> anyhow::Result<DateTime<Local>> {
    let raw = input.trim();

    if let Ok(fixed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(fixed.with_timezone(&Local));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return local_from_naive(naive, raw);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return local_from_naive(date.and_time(NaiveTime::MIN), raw);
    }

    bail!("unrecognized deadline '{raw}'; use YYYY-MM-DD, YYYY-MM-DD HH:MM, or RFC 3339")
}

fn local_from_naive(naive: NaiveDateTime, raw: &str) -> anyhow::Result<DateTime<Local>> {
    // DST gaps make some wall-clock times nonexistent; ambiguous ones take
    // the earlier instant.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| anyhow!("deadline '{raw}' does not exist in the local timezone"))
}
