// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            let n = export_transactions(conn, &fmt, out)?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes every transaction, oldest first, as CSV or pretty JSON. Returns the row count.
pub fn export_transactions(conn: &Connection, fmt: &str, out: &str) -> Result<usize> {
    let mut stmt = conn.prepare(
        "SELECT t.date, t.description, t.amount, cur.code, c.name, t.notes
         FROM transactions t
         JOIN currencies cur ON t.currency_id=cur.id
         LEFT JOIN categories c ON t.category_id=c.id
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    let mut count = 0;
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "description", "amount", "currency", "category", "notes"])?;
            for row in rows {
                let (d, desc, amt, ccy, cat, notes) = row?;
                wtr.write_record([
                    d,
                    desc,
                    amt,
                    ccy,
                    cat.unwrap_or_default(),
                    notes.unwrap_or_default(),
                ])?;
                count += 1;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, desc, amt, ccy, cat, notes) = row?;
                items.push(json!({
                    "date": d, "description": desc, "amount": amt, "currency": ccy, "category": cat, "notes": notes
                }));
            }
            count = items.len();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    tracing::info!(count, format = fmt, path = out, "transactions exported");
    Ok(count)
}
