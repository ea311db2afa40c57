// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::{Value, json};
use spendwatch::commands::{categories, exporter, transactions};
use spendwatch::models::NewTransaction;
use spendwatch::utils::id_for_currency;
use spendwatch::{cli, db};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    let food = categories::add(&conn, "Food").unwrap();
    let today = ymd(2025, 8, 20);
    let rows = [
        ("2025-08-02", "12.50", "SEK", "Coffee beans", None),
        ("2025-08-01", "42", "EUR", "Dinner", Some("Lyon")),
    ];
    for (date, amount, ccy, desc, notes) in rows {
        let tx = NewTransaction {
            amount: Some(amount.parse().unwrap()),
            description: Some(desc.into()),
            category_id: Some(food),
            currency_id: Some(id_for_currency(&conn, ccy).unwrap()),
            date: Some(date.parse().unwrap()),
            notes: notes.map(String::from),
        };
        transactions::add(&conn, &tx, today).unwrap();
    }
    conn
}

#[test]
fn export_csv_oldest_first() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tx.csv");
    let out = out_path.to_str().unwrap();

    let matches = cli::build_cli().get_matches_from(["spendwatch", "export", "transactions", "--out", out]);
    if let Some(("export", m)) = matches.subcommand() {
        exporter::handle(&conn, m).unwrap();
    } else {
        panic!("expected export subcommand");
    }

    let text = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "date,description,amount,currency,category,notes",
            "2025-08-01,Dinner,42,EUR,Food,Lyon",
            "2025-08-02,Coffee beans,12.5,SEK,Food,",
        ]
    );
}

#[test]
fn export_json() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tx.json");

    let n = exporter::export_transactions(&conn, "json", out_path.to_str().unwrap()).unwrap();
    assert_eq!(n, 2);

    let v: Value = serde_json::from_str(&std::fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(
        v,
        json!([
            {"date": "2025-08-01", "description": "Dinner", "amount": "42", "currency": "EUR", "category": "Food", "notes": "Lyon"},
            {"date": "2025-08-02", "description": "Coffee beans", "amount": "12.5", "currency": "SEK", "category": "Food", "notes": null}
        ])
    );
}

#[test]
fn export_unknown_format_fails() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tx.xml");
    let res = exporter::export_transactions(&conn, "xml", out_path.to_str().unwrap());
    assert!(res.is_err());
    assert!(!out_path.exists());

    let parsed = cli::build_cli().try_get_matches_from(["spendwatch", "export", "transactions", "--format", "xml", "--out", "x"]);
    assert!(parsed.is_err());
}
