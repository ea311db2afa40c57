// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{id_for_category, pretty_table};
use crate::validation::{TextRule, ValidationErrors, check_text};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = add(conn, name)?;
            println!("Added category '{}' (#{})", name, id);
        }
        Some(("list", _)) => {
            let data = list(conn)?
                .into_iter()
                .map(|c| vec![c.id.to_string(), c.name])
                .collect();
            println!("{}", pretty_table(&["ID", "Category"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            remove(conn, name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, name: &str) -> Result<i64> {
    let mut errs = ValidationErrors::new();
    check_text(&mut errs, "name", Some(name), TextRule::required("Category name", 2, 100));
    errs.into_result()?;
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])
        .with_context(|| format!("Could not add category '{}'", name))?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name, "category added");
    Ok(id)
}

pub fn list(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Fails while transactions still reference the category; its budgets go with it.
pub fn remove(conn: &Connection, name: &str) -> Result<()> {
    let id = id_for_category(conn, name)?;
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        anyhow::bail!(
            "Category '{}' still has {} transaction(s); move or delete them first",
            name.trim(),
            used
        );
    }
    conn.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tracing::info!(id, "category removed");
    Ok(())
}
