// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendwatch::commands::fx;
use spendwatch::config::{get_home_currency, set_home_currency};
use spendwatch::utils::fx_convert;
use spendwatch::{cli, db};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    set_home_currency(&conn, "USD").unwrap();
    conn
}

#[test]
fn fx_triangulation_and_reciprocal() {
    let conn = setup();
    // USD->INR and USD->EUR available
    fx::add_rate(&conn, ymd(2025, 8, 1), "USD", "INR", Decimal::new(83, 0)).unwrap();
    fx::add_rate(&conn, ymd(2025, 8, 1), "USD", "EUR", Decimal::new(90, 2)).unwrap();

    // 90 EUR -> 100 USD -> 8300 INR
    let res = fx_convert(&conn, ymd(2025, 8, 15), Decimal::new(9000, 2), "EUR", "INR").unwrap();
    assert_eq!(format!("{:.2}", res.round_dp(2)), "8300.00");

    // 166 INR -> 2 USD
    let res2 = fx_convert(&conn, ymd(2025, 8, 15), Decimal::new(16600, 2), "INR", "USD").unwrap();
    assert_eq!(format!("{:.2}", res2.round_dp(2)), "2.00");

    // only NOK->GBP is known, so GBP->NOK uses its reciprocal
    fx::add_rate(&conn, ymd(2025, 8, 1), "NOK", "GBP", Decimal::new(75, 3)).unwrap();
    let res3 = fx_convert(&conn, ymd(2025, 8, 15), Decimal::new(75, 1), "GBP", "NOK").unwrap();
    assert_eq!(format!("{:.2}", res3.round_dp(2)), "100.00");
}

#[test]
fn uses_latest_rate_on_or_before_date() {
    let conn = setup();
    fx::add_rate(&conn, ymd(2025, 1, 1), "USD", "EUR", Decimal::new(80, 2)).unwrap();
    fx::add_rate(&conn, ymd(2025, 2, 1), "USD", "EUR", Decimal::new(90, 2)).unwrap();
    let hundred = Decimal::ONE_HUNDRED;

    let jan = fx_convert(&conn, ymd(2025, 1, 15), hundred, "USD", "EUR").unwrap();
    assert_eq!(jan, Decimal::new(80, 0));
    let mar = fx_convert(&conn, ymd(2025, 3, 1), hundred, "USD", "EUR").unwrap();
    assert_eq!(mar, Decimal::new(90, 0));

    // nothing that early: left as is
    let before = fx_convert(&conn, ymd(2024, 12, 31), hundred, "USD", "EUR").unwrap();
    assert_eq!(before, hundred);

    // re-adding a date replaces the rate
    fx::add_rate(&conn, ymd(2025, 2, 1), "USD", "EUR", Decimal::new(95, 2)).unwrap();
    let mar = fx_convert(&conn, ymd(2025, 3, 1), hundred, "USD", "EUR").unwrap();
    assert_eq!(mar, Decimal::new(95, 0));
}

#[test]
fn rejects_bad_rates() {
    let conn = setup();
    assert!(fx::add_rate(&conn, ymd(2025, 1, 1), "USD", "EUR", Decimal::ZERO).is_err());
    assert!(fx::add_rate(&conn, ymd(2025, 1, 1), "USD", "EUR", Decimal::new(-1, 0)).is_err());
    assert!(fx::add_rate(&conn, ymd(2025, 1, 1), "EUR", "EUR", Decimal::ONE).is_err());
}

#[test]
fn set_home_requires_known_currency() {
    let conn = db::open_in_memory().unwrap();
    assert_eq!(get_home_currency(&conn).unwrap(), "SEK");

    let matches = cli::build_cli().get_matches_from(["spendwatch", "fx", "set-home", "XYZ"]);
    let (_, fx_m) = matches.subcommand().unwrap();
    assert!(fx::handle(&conn, fx_m).is_err());
    assert_eq!(get_home_currency(&conn).unwrap(), "SEK");

    let matches = cli::build_cli().get_matches_from(["spendwatch", "fx", "set-home", "eur"]);
    let (_, fx_m) = matches.subcommand().unwrap();
    fx::handle(&conn, fx_m).unwrap();
    assert_eq!(get_home_currency(&conn).unwrap(), "EUR");
}
