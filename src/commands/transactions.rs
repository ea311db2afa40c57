// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::budgets::{impact_of, print_impact};
use crate::config::{Settings, get_home_currency};
use crate::format::{format_money, format_percent};
use crate::impact::ImpactReport;
use crate::models::{NewTransaction, Transaction};
use crate::status::percentage_of;
use crate::utils::{
    currency_code, fx_convert, id_for_category, id_for_currency, maybe_print_json, parse_date,
    parse_decimal, parse_month, pretty_table, stored_decimal, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_cmd(conn, sub)?,
        Some(("list", sub)) => list_cmd(conn, sub)?,
        Some(("edit", sub)) => edit_cmd(conn, sub)?,
        Some(("summary", sub)) => summary_cmd(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            remove(conn, id)?;
            println!("Removed transaction #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewTransaction {
        amount: Some(parse_decimal(sub.get_one::<String>("amount").unwrap())?),
        description: sub.get_one::<String>("description").cloned(),
        category_id: Some(id_for_category(conn, sub.get_one::<String>("category").unwrap())?),
        currency_id: Some(id_for_currency(conn, sub.get_one::<String>("currency").unwrap())?),
        date: Some(parse_date(sub.get_one::<String>("date").unwrap())?),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    new.validate(today())?;
    let settings = Settings::load(conn)?;
    let report = preview_new(conn, &new, &settings)?;

    if sub.get_flag("preview") {
        print_impact(&report);
        return Ok(());
    }
    let id = add(conn, &new, today())?;
    let ccy = currency_code(conn, new.currency_id.unwrap_or_default())?;
    println!(
        "Recorded #{}: {} on {} for '{}'",
        id,
        format_money(new.amount.unwrap_or_default(), &ccy),
        new.date.map(|d| d.to_string()).unwrap_or_default(),
        new.description.as_deref().unwrap_or_default()
    );
    if !report.is_empty() {
        print_impact(&report);
    }
    Ok(())
}

/// Budget impact of a not-yet-stored transaction.
pub fn preview_new(conn: &Connection, new: &NewTransaction, settings: &Settings) -> Result<ImpactReport> {
    let (Some(category_id), Some(date), Some(amount), Some(currency_id)) =
        (new.category_id, new.date, new.amount, new.currency_id)
    else {
        return Ok(ImpactReport::default());
    };
    let ccy = currency_code(conn, currency_id)?;
    impact_of(conn, category_id, date, amount, &ccy, &settings.thresholds)
}

pub fn add(conn: &Connection, new: &NewTransaction, today: NaiveDate) -> Result<i64> {
    new.validate(today)?;
    conn.execute(
        "INSERT INTO transactions(date, amount, currency_id, category_id, description, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.date.map(|d| d.to_string()),
            new.amount.map(|a| a.normalize().to_string()),
            new.currency_id,
            new.category_id,
            new.description,
            new.notes.as_deref().filter(|n| !n.is_empty()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, "transaction recorded");
    Ok(id)
}

pub fn load(conn: &Connection, id: i64) -> Result<Transaction> {
    let raw = conn
        .query_row(
            "SELECT id, date, amount, currency_id, category_id, description, notes
             FROM transactions WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, i64>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, Option<String>>(6)?,
                ))
            },
        )
        .optional()?
        .with_context(|| format!("Transaction #{} not found", id))?;
    let (id, date, amount, currency_id, category_id, description, notes) = raw;
    Ok(Transaction {
        id,
        date: parse_date(&date)?,
        amount: stored_decimal(&amount, &format!("transaction #{}", id))?,
        currency_id,
        category_id,
        description,
        notes,
    })
}

/// Fields to change on a stored transaction; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub currency_id: Option<i64>,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

fn edit_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let changes = TransactionChanges {
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        currency_id: sub
            .get_one::<String>("currency")
            .map(|c| id_for_currency(conn, c))
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|c| id_for_category(conn, c))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        notes: sub.get_one::<String>("notes").cloned(),
    };
    edit(conn, id, &changes, today())?;
    println!("Updated transaction #{}", id);
    Ok(())
}

pub fn edit(conn: &Connection, id: i64, changes: &TransactionChanges, today: NaiveDate) -> Result<()> {
    let cur = load(conn, id)?;
    let merged = NewTransaction {
        amount: Some(changes.amount.unwrap_or(cur.amount)),
        description: Some(changes.description.clone().unwrap_or(cur.description)),
        category_id: Some(changes.category_id.unwrap_or(cur.category_id)),
        currency_id: Some(changes.currency_id.unwrap_or(cur.currency_id)),
        date: Some(changes.date.unwrap_or(cur.date)),
        notes: changes.notes.clone().or(cur.notes),
    };
    merged.validate(today)?;
    conn.execute(
        "UPDATE transactions SET date=?1, amount=?2, currency_id=?3, category_id=?4,
         description=?5, notes=?6 WHERE id=?7",
        params![
            merged.date.map(|d| d.to_string()),
            merged.amount.map(|a| a.normalize().to_string()),
            merged.currency_id,
            merged.category_id,
            merged.description,
            merged.notes.as_deref().filter(|n| !n.is_empty()),
            id
        ],
    )?;
    tracing::info!(id, "transaction updated");
    Ok(())
}

pub fn remove(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        anyhow::bail!("Transaction #{} not found", id);
    }
    tracing::info!(id, "transaction removed");
    Ok(())
}

fn list_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "CCY", "Category", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub notes: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.description, t.amount, cur.code, c.name, t.notes FROM transactions t
         JOIN currencies cur ON t.currency_id=cur.id
         LEFT JOIN categories c ON t.category_id=c.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(parse_month(month)?);
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND c.name=?");
        params_vec.push(cat.trim().into());
    }
    if let Some(term) = sub.get_one::<String>("search") {
        sql.push_str(" AND (t.description LIKE ? OR IFNULL(t.notes,'') LIKE ?)");
        let pattern = format!("%{}%", term.trim());
        params_vec.push(pattern.clone());
        params_vec.push(pattern);
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let category: Option<String> = r.get(5)?;
        let notes: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            description: r.get(2)?,
            amount: r.get(3)?,
            currency: r.get(4)?,
            category: category.unwrap_or_default(),
            notes: notes.unwrap_or_default(),
        });
    }
    Ok(data)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub transaction_count: usize,
}

/// Expense totals in the home currency, largest category first.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSummary {
    pub currency: String,
    pub total_expenses: Decimal,
    pub transaction_count: usize,
    pub categories: Vec<CategoryTotal>,
}

impl TransactionSummary {
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.categories.first()
    }

    /// Share of all expenses taken by the top category, in percent.
    pub fn top_share(&self) -> Option<Decimal> {
        self.top_category()
            .map(|c| percentage_of(c.total, self.total_expenses))
    }
}

pub fn summary(conn: &Connection, month: Option<&str>) -> Result<TransactionSummary> {
    let home = get_home_currency(conn)?;
    let mut sql = String::from(
        "SELECT t.date, t.amount, cur.code, c.name FROM transactions t
         JOIN currencies cur ON t.currency_id=cur.id
         LEFT JOIN categories c ON t.category_id=c.id",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(m) = month {
        sql.push_str(" WHERE substr(t.date,1,7)=?");
        params_vec.push(parse_month(m)?);
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut by_category: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    let mut count = 0usize;
    while let Some(r) = rows.next()? {
        let date = parse_date(&r.get::<_, String>(0)?)?;
        let amount = stored_decimal(&r.get::<_, String>(1)?, "transactions")?;
        let ccy: String = r.get(2)?;
        let category: Option<String> = r.get(3)?;
        let converted = fx_convert(conn, date, amount, &ccy, &home)?;
        let entry = by_category.entry(category.unwrap_or_default()).or_default();
        entry.0 += converted;
        entry.1 += 1;
        total += converted;
        count += 1;
    }

    let mut categories: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, transaction_count))| CategoryTotal {
            category,
            total,
            transaction_count,
        })
        .collect();
    categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    tracing::debug!(%total, count, currency = %home, "transaction summary");
    Ok(TransactionSummary {
        currency: home,
        total_expenses: total,
        transaction_count: count,
        categories,
    })
}

fn summary_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = summary(conn, sub.get_one::<String>("month").map(String::as_str))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let top = match (s.top_category(), s.top_share()) {
        (Some(c), Some(share)) => vec![
            "Top Category".into(),
            format_money(c.total, &s.currency),
            format!("{} - {} of total", c.category, format_percent(share)),
        ],
        _ => vec![
            "Top Category".into(),
            "No expenses yet".into(),
            "Start tracking your spending".into(),
        ],
    };
    let rows = vec![
        vec![
            "Total Expenses".into(),
            format_money(s.total_expenses, &s.currency),
            format!(
                "{} transaction{}",
                s.transaction_count,
                if s.transaction_count == 1 { "" } else { "s" }
            ),
        ],
        top,
    ];
    println!("{}", pretty_table(&["", "Amount", "Detail"], rows));
    Ok(())
}
