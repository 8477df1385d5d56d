// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Priority, Task};
use crate::utils::{
    category_label, category_names, fmt_datetime, id_for_category, maybe_print_json, parse_date,
    parse_db_datetime, pretty_table,
};
use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("done", sub)) => done(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let description = sub.get_one::<String>("desc");
    let deadline = parse_date(sub.get_one::<String>("deadline").unwrap())?;
    let priority: Priority = sub.get_one::<String>("priority").unwrap().parse()?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|name| id_for_category(conn, name, "TASK"))
        .transpose()?;

    conn.execute(
        "INSERT INTO tasks(title, description, deadline, priority, category_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            title,
            description,
            deadline.to_string(),
            priority.as_str(),
            category_id
        ],
    )?;
    println!("Added task '{}' due {}", title, deadline);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let priority = sub
        .get_one::<String>("priority")
        .map(|s| s.parse::<Priority>())
        .transpose()?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|name| id_for_category(conn, name, "TASK"))
        .transpose()?;
    let search = sub.get_one::<String>("search").map(|s| s.as_str());
    let include_completed = sub.get_flag("all");

    let tasks = load_all(conn)?;
    let visible = filter_tasks(&tasks, search, priority, category_id, include_completed);
    let names = category_names(conn)?;
    let today = Local::now().date_naive();

    let data: Vec<TaskRow> = visible
        .iter()
        .map(|t| TaskRow {
            id: t.id,
            title: t.title.clone(),
            priority: t.priority.as_str().to_string(),
            deadline: t.deadline.to_string(),
            category: category_label(&names, t.category_id),
            status: status_label(t, today).to_string(),
        })
        .collect();

    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.title.clone(),
                    r.priority.clone(),
                    r.deadline.clone(),
                    r.category.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Title", "Priority", "Deadline", "Category", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn done(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let now = Local::now().naive_local();
    let n = conn.execute(
        "UPDATE tasks SET is_completed=1, completed_at=?1 WHERE id=?2 AND is_completed=0",
        params![fmt_datetime(now), id],
    )?;
    if n == 0 {
        bail!("Task {} not found or already completed", id);
    }
    println!("Completed task {}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM tasks WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Task {} not found", id);
    }
    println!("Deleted task {}", id);
    Ok(())
}

pub fn load_all(conn: &Connection) -> Result<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, deadline, is_completed, priority, category_id, created_at, completed_at
         FROM tasks ORDER BY deadline ASC, id ASC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let deadline_s: String = r.get(3)?;
        let priority_s: String = r.get(5)?;
        let created_s: String = r.get(7)?;
        let completed_s: Option<String> = r.get(8)?;
        data.push(Task {
            id: r.get(0)?,
            title: r.get(1)?,
            description: r.get(2)?,
            deadline: parse_date(&deadline_s)?,
            is_completed: r.get(4)?,
            priority: priority_s.parse()?,
            category_id: r.get(6)?,
            created_at: parse_db_datetime(&created_s)?,
            completed_at: completed_s.map(|s| parse_db_datetime(&s)).transpose()?,
        });
    }
    Ok(data)
}

/// Search/priority/category/completion filtering. Search is a
/// case-insensitive substring match over title and description.
pub fn filter_tasks(
    tasks: &[Task],
    search: Option<&str>,
    priority: Option<Priority>,
    category_id: Option<i64>,
    include_completed: bool,
) -> Vec<Task> {
    let needle = search.map(|s| s.to_lowercase());
    tasks
        .iter()
        .filter(|t| {
            let matches_search = needle.as_deref().is_none_or(|q| {
                t.title.to_lowercase().contains(q)
                    || t.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(q))
            });
            let matches_priority = priority.is_none_or(|p| t.priority == p);
            let matches_category = category_id.is_none_or(|c| t.category_id == Some(c));
            let matches_completed = include_completed || !t.is_completed;
            matches_search && matches_priority && matches_category && matches_completed
        })
        .cloned()
        .collect()
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.is_completed && task.deadline < today
}

fn status_label(task: &Task, today: NaiveDate) -> &'static str {
    if task.is_completed {
        "done"
    } else if is_overdue(task, today) {
        "OVERDUE"
    } else {
        "pending"
    }
}

#[derive(Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub priority: String,
    pub deadline: String,
    pub category: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub high_priority: usize,
    pub completed: usize,
}

impl TaskStats {
    /// Completed share of all tasks as a percentage; 0 when there are none.
    pub fn completion_rate(&self) -> Decimal {
        if self.total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.completed) / Decimal::from(self.total) * Decimal::ONE_HUNDRED
    }
}

/// Dashboard counters: pending, high-priority pending, completed.
pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };
    for t in tasks {
        if t.is_completed {
            stats.completed += 1;
        } else {
            stats.pending += 1;
            if t.priority == Priority::High {
                stats.high_priority += 1;
            }
        }
    }
    stats
}
