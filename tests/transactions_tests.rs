// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use spendwatch::commands::{budgets, categories, transactions};
use spendwatch::config::Settings;
use spendwatch::models::{NewBudget, NewTransaction};
use spendwatch::period::BudgetPeriod;
use spendwatch::status::BudgetStatus;
use spendwatch::{cli, db};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    ymd(2025, 8, 20)
}

fn lunch(amount: &str, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        amount: Some(amount.parse().unwrap()),
        description: Some("Lunch".into()),
        category_id: Some(1),
        currency_id: Some(1),
        date: Some(date),
        notes: None,
    }
}

fn setup() -> Connection {
    let conn = db::open_in_memory().unwrap();
    categories::add(&conn, "Food").unwrap();
    categories::add(&conn, "Rent").unwrap();
    for i in 1..=3 {
        transactions::add(&conn, &lunch("10", ymd(2025, 7, i)), today()).unwrap();
    }
    conn
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["spendwatch", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-07-03");
            assert_eq!(rows[1].date, "2025-07-02");
            assert_eq!(rows[0].currency, "SEK");
            assert_eq!(rows[0].category, "Food");
        } else {
            panic!("expected list subcommand");
        }
    } else {
        panic!("expected tx subcommand");
    }
}

#[test]
fn list_filters_by_month_and_category() {
    let conn = setup();
    let mut rent = lunch("9500", ymd(2025, 8, 1));
    rent.category_id = Some(2);
    rent.description = Some("August rent".into());
    transactions::add(&conn, &rent, today()).unwrap();

    let matches = cli::build_cli().get_matches_from(["spendwatch", "tx", "list", "--month", "2025-08"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "August rent");

    let matches = cli::build_cli().get_matches_from(["spendwatch", "tx", "list", "--category", "Food"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert_eq!(transactions::query_rows(&conn, list_m).unwrap().len(), 3);
}

#[test]
fn add_rejects_bad_input() {
    let conn = setup();
    let mut tx = lunch("12.345", ymd(2025, 8, 21));
    tx.description = Some("Lunch  out".into());
    let err = transactions::add(&conn, &tx, today()).unwrap_err().to_string();
    assert!(err.contains("Amount can have at most 2 decimal places."), "{}", err);
    assert!(err.contains("Transaction date cannot be in the future."), "{}", err);
    assert!(err.contains("Description cannot have multiple consecutive spaces."), "{}", err);

    let blank = NewTransaction::default();
    let err = transactions::add(&conn, &blank, today()).unwrap_err().to_string();
    assert!(err.contains("Amount is required."));
    assert!(err.contains("Category is required."));
}

#[test]
fn edit_merges_and_clears_notes() {
    let conn = setup();
    let mut tx = lunch("25", ymd(2025, 8, 2));
    tx.notes = Some("with team".into());
    let id = transactions::add(&conn, &tx, today()).unwrap();

    let changes = transactions::TransactionChanges {
        amount: Some(Decimal::new(3050, 2)),
        notes: Some(String::new()),
        ..Default::default()
    };
    transactions::edit(&conn, id, &changes, today()).unwrap();
    let t = transactions::load(&conn, id).unwrap();
    assert_eq!(t.amount, Decimal::new(305, 1));
    assert_eq!(t.description, "Lunch");
    assert_eq!(t.notes, None);

    let future = transactions::TransactionChanges {
        date: Some(ymd(2025, 9, 1)),
        ..Default::default()
    };
    assert!(transactions::edit(&conn, id, &future, today()).is_err());
    assert_eq!(transactions::load(&conn, id).unwrap().date, ymd(2025, 8, 2));
}

#[test]
fn remove_and_category_guard() {
    let conn = setup();
    let err = categories::remove(&conn, "Food").unwrap_err();
    assert!(err.to_string().contains("still has 3 transaction(s)"));

    transactions::remove(&conn, 1).unwrap();
    assert!(transactions::remove(&conn, 1).is_err());
    assert!(transactions::load(&conn, 1).is_err());

    categories::remove(&conn, "Rent").unwrap();
    let names: Vec<String> = categories::list(&conn).unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Food"]);
}

#[test]
fn preview_does_not_store() {
    let conn = setup();
    let budget = NewBudget {
        category_id: Some(1),
        amount: Some(Decimal::new(100, 0)),
        currency_id: Some(1),
        period: Some(BudgetPeriod::Monthly),
        start_date: Some(ymd(2025, 8, 1)),
        description: None,
    };
    budgets::add(&conn, &budget, today()).unwrap();

    let settings = Settings::load(&conn).unwrap();
    let report = transactions::preview_new(&conn, &lunch("120", ymd(2025, 8, 15)), &settings).unwrap();
    assert_eq!(report.affected.len(), 1);
    let i = &report.affected[0];
    assert!(i.will_exceed);
    assert_eq!(i.exceed_amount, Decimal::new(20, 0));
    assert_eq!(i.status_after, BudgetStatus::OverBudget);
    assert_eq!(
        i.alert_message.as_deref(),
        Some("Food will be over budget by 20,00 kr (120.0% spent)")
    );

    let matches = cli::build_cli().get_matches_from(["spendwatch", "tx", "list"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert_eq!(transactions::query_rows(&conn, list_m).unwrap().len(), 3);
}

#[test]
fn list_search_matches_description_and_notes() {
    let conn = setup();
    let mut taxi = lunch("240", ymd(2025, 8, 3));
    taxi.description = Some("Airport taxi".into());
    transactions::add(&conn, &taxi, today()).unwrap();
    let mut dinner = lunch("310", ymd(2025, 8, 4));
    dinner.description = Some("Dinner".into());
    dinner.notes = Some("shared taxi home".into());
    transactions::add(&conn, &dinner, today()).unwrap();

    let matches = cli::build_cli().get_matches_from(["spendwatch", "tx", "list", "--search", "TAXI"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    let found: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(found, vec!["Dinner", "Airport taxi"]);
}

#[test]
fn summary_totals_in_home_currency() {
    let conn = setup();
    // 1 SEK = 0.1 EUR
    spendwatch::commands::fx::add_rate(&conn, ymd(2025, 8, 1), "SEK", "EUR", Decimal::new(1, 1)).unwrap();
    transactions::add(&conn, &lunch("100", ymd(2025, 8, 2)), today()).unwrap();
    let mut abroad = lunch("10", ymd(2025, 8, 3));
    abroad.currency_id = Some(spendwatch::utils::id_for_currency(&conn, "EUR").unwrap());
    transactions::add(&conn, &abroad, today()).unwrap();
    let mut rent = lunch("50", ymd(2025, 8, 4));
    rent.category_id = Some(2);
    transactions::add(&conn, &rent, today()).unwrap();

    let aug = transactions::summary(&conn, Some("2025-08")).unwrap();
    assert_eq!(aug.currency, "SEK");
    assert_eq!(aug.total_expenses, Decimal::new(250, 0));
    assert_eq!(aug.transaction_count, 3);
    let top = aug.top_category().unwrap();
    assert_eq!(top.category, "Food");
    assert_eq!(top.total, Decimal::new(200, 0));
    assert_eq!(top.transaction_count, 2);
    assert_eq!(aug.top_share(), Some(Decimal::new(80, 0)));
    assert_eq!(aug.categories[1].category, "Rent");

    // July lunches from setup count too without a month
    let all = transactions::summary(&conn, None).unwrap();
    assert_eq!(all.total_expenses, Decimal::new(280, 0));
    assert_eq!(all.transaction_count, 6);
}

#[test]
fn summary_without_expenses() {
    let conn = db::open_in_memory().unwrap();
    let s = transactions::summary(&conn, None).unwrap();
    assert_eq!(s.total_expenses, Decimal::ZERO);
    assert_eq!(s.transaction_count, 0);
    assert!(s.top_category().is_none());
    assert_eq!(s.top_share(), None);

    let setup_conn = setup();
    let empty_month = transactions::summary(&setup_conn, Some("2024-01")).unwrap();
    assert!(empty_month.categories.is_empty());
    assert!(transactions::summary(&setup_conn, Some("2024-13")).is_err());
}
