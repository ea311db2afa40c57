// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::utils::pretty_table;
use crate::validation::{TextRule, ValidationErrors, check_currency_code, check_text};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            let name = sub.get_one::<String>("name").unwrap();
            let symbol = sub
                .get_one::<String>("symbol")
                .cloned()
                .unwrap_or_else(|| code.clone());
            add(conn, &code, name, &symbol)?;
            println!("Added currency {} ({})", code, name);
        }
        Some(("list", _)) => {
            let data = list(conn)?
                .into_iter()
                .map(|c| vec![c.code, c.name, c.symbol])
                .collect();
            println!("{}", pretty_table(&["Code", "Name", "Symbol"], data));
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, code: &str, name: &str, symbol: &str) -> Result<i64> {
    let mut errs = ValidationErrors::new();
    check_currency_code(&mut errs, "code", code);
    check_text(&mut errs, "name", Some(name), TextRule::required("Currency name", 2, 100));
    check_text(&mut errs, "symbol", Some(symbol), TextRule::required("Symbol", 1, 8));
    errs.into_result()?;
    conn.execute(
        "INSERT INTO currencies(code, name, symbol) VALUES (?1, ?2, ?3)",
        params![code, name, symbol],
    )
    .with_context(|| format!("Could not add currency '{}'", code))?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, code, "currency added");
    Ok(id)
}

pub fn list(conn: &Connection) -> Result<Vec<Currency>> {
    let mut stmt = conn.prepare("SELECT id, code, name, symbol FROM currencies ORDER BY code")?;
    let rows = stmt.query_map([], |r| {
        Ok(Currency {
            id: r.get(0)?,
            code: r.get(1)?,
            name: r.get(2)?,
            symbol: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
