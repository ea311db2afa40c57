// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{get_home_currency, set_home_currency};
use crate::utils::{
    fx_convert, http_client, id_for_currency, parse_date, parse_decimal, pretty_table,
};
use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-home", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
            id_for_currency(conn, &ccy)?;
            set_home_currency(conn, &ccy)?;
            tracing::info!(currency = %ccy, "home currency changed");
            println!("Home currency set to {}", ccy);
        }
        Some(("add", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let base = sub.get_one::<String>("base").unwrap().trim().to_uppercase();
            let quote = sub.get_one::<String>("quote").unwrap().trim().to_uppercase();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            add_rate(conn, date, &base, &quote, rate)?;
            println!("1 {} = {} {} on {}", base, rate, quote, date);
        }
        Some(("fetch", sub)) => {
            let days: usize = *sub.get_one::<usize>("days").unwrap_or(&120);
            fetch_rates(conn, days)?;
        }
        Some(("list", _)) => list_rates(conn)?,
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Stores or replaces the `base -> quote` rate for `date`.
pub fn add_rate(conn: &Connection, date: NaiveDate, base: &str, quote: &str, rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        bail!("Rate must be positive, got {}", rate);
    }
    if base == quote {
        bail!("Base and quote currency are both {}", base);
    }
    conn.execute(
        "INSERT INTO fx_rates(date, base, quote, rate) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date, base, quote) DO UPDATE SET rate=excluded.rate",
        params![date.to_string(), base, quote, rate.to_string()],
    )?;
    tracing::debug!(%date, base, quote, %rate, "fx rate stored");
    Ok(())
}

fn used_currencies(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT c.code FROM currencies c
         WHERE c.id IN (SELECT currency_id FROM transactions UNION SELECT currency_id FROM budgets)
         ORDER BY c.code",
    )?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct Series {
    rates: HashMap<String, HashMap<String, f64>>,
    #[serde(rename = "base")]
    _base: String,
}

fn fetch_rates(conn: &Connection, days: usize) -> Result<()> {
    let home = get_home_currency(conn)?;
    let today = Utc::now().date_naive();
    let start = today - chrono::Duration::days(days as i64);
    let targets: Vec<String> = used_currencies(conn)?
        .into_iter()
        .filter(|c| c != &home)
        .collect();
    if targets.is_empty() {
        println!("No foreign currencies in use; nothing to fetch.");
        return Ok(());
    }
    let to_param = targets.join(",");
    let url = format!("https://api.frankfurter.dev/{start}..{today}?from={home}&to={to_param}");
    tracing::info!(%url, "fetching fx rates");
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let s: Series = resp.json()?;
    let mut stored = 0usize;
    for (date, mp) in s.rates {
        for (quote, rate) in mp {
            stored += conn.execute(
                "INSERT OR IGNORE INTO fx_rates(date, base, quote, rate) VALUES (?1, ?2, ?3, ?4)",
                params![date, home, quote, rate.to_string()],
            )?;
        }
    }
    tracing::info!(stored, "fx rates saved");
    println!("Stored {} FX rates via Frankfurter (ECB).", stored);
    Ok(())
}

fn list_rates(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT date, base, quote, rate FROM fx_rates ORDER BY date DESC, base, quote LIMIT 50",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (d, b, q, r) = row?;
        data.push(vec![d, b, q, r]);
    }
    println!("{}", pretty_table(&["Date", "Base", "Quote", "Rate"], data));
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().trim().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().trim().to_uppercase();
    let res = fx_convert(conn, date, amount, &from, &to)?;
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}
