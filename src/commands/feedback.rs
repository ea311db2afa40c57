// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Feedback, FeedbackPriority, FeedbackStatus, FeedbackType, NewFeedback};
use crate::format::format_relative;
use crate::utils::{maybe_print_json, pretty_table, today};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("submit", sub)) => {
            let kind = sub.get_one::<String>("type").unwrap();
            let priority = sub.get_one::<String>("priority").unwrap();
            let new = NewFeedback {
                kind: Some(
                    FeedbackType::parse(kind)
                        .map(|t| t.code())
                        .with_context(|| format!("Unknown feedback type '{}'", kind))?,
                ),
                priority: Some(
                    FeedbackPriority::parse(priority)
                        .map(|p| p.code())
                        .with_context(|| format!("Unknown priority '{}'", priority))?,
                ),
                subject: sub.get_one::<String>("subject").cloned(),
                description: sub.get_one::<String>("description").cloned(),
            };
            let id = submit(conn, &new)?;
            println!("Thanks! Feedback #{} recorded.", id);
        }
        Some(("list", sub)) => {
            let items = list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let now = today();
                let rows = items
                    .into_iter()
                    .map(|f| {
                        vec![
                            f.id.to_string(),
                            f.kind.label().to_string(),
                            f.priority.label().to_string(),
                            f.status.label().to_string(),
                            f.subject,
                            format_relative(f.created_at.date(), now),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Type", "Priority", "Status", "Subject", "Created"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn submit(conn: &Connection, new: &NewFeedback) -> Result<i64> {
    new.validate()?;
    conn.execute(
        "INSERT INTO feedback(type, priority, subject, description, status) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.kind,
            new.priority,
            new.subject,
            new.description,
            FeedbackStatus::Open.code()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, "feedback submitted");
    Ok(id)
}

pub fn list(conn: &Connection) -> Result<Vec<Feedback>> {
    let mut stmt = conn.prepare(
        "SELECT id, type, priority, subject, description, status, created_at
         FROM feedback ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, i64>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, i64>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, kind, priority, subject, description, status, created) = row?;
        out.push(Feedback {
            id,
            kind: FeedbackType::from_code(kind)
                .with_context(|| format!("Invalid feedback type {} on #{}", kind, id))?,
            priority: FeedbackPriority::from_code(priority)
                .with_context(|| format!("Invalid priority {} on #{}", priority, id))?,
            subject,
            description,
            status: FeedbackStatus::from_code(status)
                .with_context(|| format!("Invalid status {} on #{}", status, id))?,
            created_at: NaiveDateTime::parse_from_str(&created, "%Y-%m-%d %H:%M:%S")
                .with_context(|| format!("Invalid timestamp '{}' on #{}", created, id))?,
        });
    }
    Ok(out)
}
