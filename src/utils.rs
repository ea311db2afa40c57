// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::config::get_home_currency;

const UA: &str = concat!("spendwatch/", env!("CARGO_PKG_VERSION"));

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "SPENDWATCH_LOG";

/// Installs the stderr `tracing` subscriber; the filter comes from `SPENDWATCH_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Reads a decimal stored as TEXT, naming the row on failure.
pub fn stored_decimal(s: &str, what: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' in {}", s, what))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name.trim()], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn id_for_currency(conn: &Connection, code: &str) -> Result<i64> {
    let code = code.trim().to_uppercase();
    let mut stmt = conn.prepare("SELECT id FROM currencies WHERE code=?1")?;
    let id: i64 = stmt
        .query_row(params![code], |r| r.get(0))
        .with_context(|| format!("Currency '{}' not found", code))?;
    Ok(id)
}

pub fn currency_code(conn: &Connection, id: i64) -> Result<String> {
    conn.query_row(
        "SELECT code FROM currencies WHERE id=?1",
        params![id],
        |r| r.get(0),
    )
    .with_context(|| format!("Currency #{} not found", id))
}

pub fn category_name(conn: &Connection, id: i64) -> Result<String> {
    conn.query_row(
        "SELECT name FROM categories WHERE id=?1",
        params![id],
        |r| r.get(0),
    )
    .with_context(|| format!("Category #{} not found", id))
}

/// Latest `base -> quote` rate on or before `date`.
pub fn find_rate(conn: &Connection, date: NaiveDate, base: &str, quote: &str) -> Result<Option<Decimal>> {
    let mut stmt = conn.prepare(
        "SELECT rate FROM fx_rates WHERE base=?1 AND quote=?2 AND date<=?3 ORDER BY date DESC LIMIT 1",
    )?;
    let r: Option<String> = stmt
        .query_row(params![base, quote, date.to_string()], |r| r.get(0))
        .optional()?;
    match r {
        Some(s) => {
            let d = s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid rate '{}' for {}/{}", s, base, quote))?;
            Ok((!d.is_zero()).then_some(d))
        }
        None => Ok(None),
    }
}

/// Convert `amount` between currencies using the closest on-or-before rate.
/// Rates are stored home->quote; other pairs go through the home currency,
/// falling back to a reciprocal of the reverse pair. Missing coverage leaves
/// the amount unchanged and logs a warning.
pub fn fx_convert(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    from_ccy: &str,
    to_ccy: &str,
) -> Result<Decimal> {
    if from_ccy == to_ccy {
        return Ok(amount);
    }
    let hub = get_home_currency(conn)?;

    if to_ccy == hub {
        if let Some(r) = find_rate(conn, date, &hub, from_ccy)? {
            return Ok(amount / r);
        }
    } else if from_ccy == hub {
        if let Some(r) = find_rate(conn, date, &hub, to_ccy)? {
            return Ok(amount * r);
        }
    } else if find_rate(conn, date, &hub, from_ccy)?.is_some()
        && find_rate(conn, date, &hub, to_ccy)?.is_some()
    {
        let hub_amt = fx_convert(conn, date, amount, from_ccy, &hub)?;
        return fx_convert(conn, date, hub_amt, &hub, to_ccy);
    }

    if let Some(r) = find_rate(conn, date, from_ccy, to_ccy)? {
        return Ok(amount * r);
    }
    if let Some(r) = find_rate(conn, date, to_ccy, from_ccy)? {
        return Ok(amount / r);
    }

    tracing::warn!(%date, from = from_ccy, to = to_ccy, "no FX rate on or before date; amount left unconverted");
    Ok(amount)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
