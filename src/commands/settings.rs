// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_thresholds};
use crate::db::db_path;
use crate::status::Thresholds;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = Settings::load(conn)?;
            let rows = vec![
                vec!["Database".into(), db_path()?.display().to_string()],
                vec!["Home currency".into(), s.home_currency],
                vec!["Warning threshold".into(), format!("{}%", s.thresholds.warning())],
                vec!["Over-budget threshold".into(), format!("{}%", s.thresholds.over())],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-thresholds", sub)) => {
            let warning = parse_decimal(sub.get_one::<String>("warning").unwrap())?;
            let over = parse_decimal(sub.get_one::<String>("over").unwrap())?;
            let t = Thresholds::new(warning, over)?;
            set_thresholds(conn, &t)?;
            tracing::info!(%warning, %over, "thresholds changed");
            println!("Warning at {}%, over budget at {}%", warning, over);
        }
        _ => {}
    }
    Ok(())
}
