// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! User settings kept in the `settings` table.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::status::Thresholds;

pub const DEFAULT_HOME_CURRENCY: &str = "SEK";

const HOME_CURRENCY: &str = "home_currency";
const WARNING_THRESHOLD: &str = "warning_threshold";
const OVER_THRESHOLD: &str = "over_threshold";

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub home_currency: String,
    pub thresholds: Thresholds,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        Ok(Self {
            home_currency: get_home_currency(conn)?,
            thresholds: get_thresholds(conn)?,
        })
    }
}

fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

fn put_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_home_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, HOME_CURRENCY)?.unwrap_or_else(|| DEFAULT_HOME_CURRENCY.to_string()))
}

pub fn set_home_currency(conn: &Connection, ccy: &str) -> Result<()> {
    put_setting(conn, HOME_CURRENCY, ccy)
}

pub fn get_thresholds(conn: &Connection) -> Result<Thresholds> {
    let read = |key: &str| -> Result<Option<Decimal>> {
        match get_setting(conn, key)? {
            Some(s) => Ok(Some(
                s.parse::<Decimal>()
                    .with_context(|| format!("Invalid {} '{}' in settings", key, s))?,
            )),
            None => Ok(None),
        }
    };
    let defaults = Thresholds::default();
    let warning = read(WARNING_THRESHOLD)?.unwrap_or(defaults.warning());
    let over = read(OVER_THRESHOLD)?.unwrap_or(defaults.over());
    Ok(Thresholds::new(warning, over)?)
}

pub fn set_thresholds(conn: &Connection, thresholds: &Thresholds) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    put_setting(&tx, WARNING_THRESHOLD, &thresholds.warning().to_string())?;
    put_setting(&tx, OVER_THRESHOLD, &thresholds.over().to_string())?;
    tx.commit()?;
    tracing::info!(warning = %thresholds.warning(), over = %thresholds.over(), "thresholds saved");
    Ok(())
}
