// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::alerts::{BudgetOverview, alert_summary_line, budget_alerts};
use crate::config::Settings;
use crate::format::{format_compact, format_date, format_money, format_percent};
use crate::impact::{ImpactReport, preview};
use crate::models::{Budget, BudgetSummary, NewBudget};
use crate::period::BudgetPeriod;
use crate::status::{Thresholds, evaluate_with};
use crate::utils::{
    category_name, currency_code, fx_convert, id_for_category, id_for_currency, maybe_print_json,
    parse_date, parse_decimal, pretty_table, stored_decimal, today,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add_cmd(conn, sub)?,
        Some(("list", sub)) => list_cmd(conn, sub)?,
        Some(("edit", sub)) => edit_cmd(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            remove(conn, id)?;
            println!("Removed budget #{}", id);
        }
        Some(("status", sub)) => status_cmd(conn, sub)?,
        Some(("alerts", sub)) => alerts_cmd(conn, sub)?,
        Some(("overview", sub)) => overview_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = NewBudget {
        category_id: Some(id_for_category(conn, sub.get_one::<String>("category").unwrap())?),
        amount: Some(parse_decimal(sub.get_one::<String>("amount").unwrap())?),
        currency_id: Some(id_for_currency(conn, sub.get_one::<String>("currency").unwrap())?),
        period: Some(sub.get_one::<String>("period").unwrap().parse::<BudgetPeriod>()?),
        start_date: Some(parse_date(sub.get_one::<String>("start").unwrap())?),
        description: sub.get_one::<String>("description").cloned(),
    };
    let id = add(conn, &new, today())?;
    let b = load(conn, id)?;
    println!(
        "Budget #{} set: {} {} {} from {} until {}",
        id,
        category_name(conn, b.category_id)?,
        b.period,
        format_money(b.amount, &currency_code(conn, b.currency_id)?),
        format_date(b.start_date),
        format_date(b.end_date)
    );
    Ok(())
}

/// Validates and stores a budget, deriving its end date from the period.
pub fn add(conn: &Connection, new: &NewBudget, today: NaiveDate) -> Result<i64> {
    new.validate(today)?;
    let (Some(period), Some(start)) = (new.period, new.start_date) else {
        anyhow::bail!("Budget period and start date are required");
    };
    let end = period.end_date(start)?;
    conn.execute(
        "INSERT INTO budgets(category_id, amount, currency_id, period, start_date, end_date, is_active, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
        params![
            new.category_id,
            new.amount.map(|a| a.normalize().to_string()),
            new.currency_id,
            period.code(),
            start.to_string(),
            end.to_string(),
            new.description.as_deref().filter(|d| !d.is_empty()),
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, period = %period, %start, %end, "budget created");
    Ok(id)
}

/// Fields to change on an existing budget; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BudgetChanges {
    pub category_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub currency_id: Option<i64>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

fn edit_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let changes = BudgetChanges {
        category_id: sub
            .get_one::<String>("category")
            .map(|c| id_for_category(conn, c))
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|a| parse_decimal(a))
            .transpose()?,
        currency_id: sub
            .get_one::<String>("currency")
            .map(|c| id_for_currency(conn, c))
            .transpose()?,
        period: sub
            .get_one::<String>("period")
            .map(|p| p.parse::<BudgetPeriod>())
            .transpose()?,
        start_date: sub
            .get_one::<String>("start")
            .map(|s| parse_date(s))
            .transpose()?,
        description: sub.get_one::<String>("description").cloned(),
        is_active: sub.get_one::<bool>("active").copied(),
    };
    edit(conn, id, &changes, today())?;
    println!("Updated budget #{}", id);
    Ok(())
}

pub fn edit(conn: &Connection, id: i64, changes: &BudgetChanges, today: NaiveDate) -> Result<()> {
    let cur = load(conn, id)?;
    let merged = NewBudget {
        category_id: Some(changes.category_id.unwrap_or(cur.category_id)),
        amount: Some(changes.amount.unwrap_or(cur.amount)),
        currency_id: Some(changes.currency_id.unwrap_or(cur.currency_id)),
        period: Some(changes.period.unwrap_or(cur.period)),
        start_date: Some(changes.start_date.unwrap_or(cur.start_date)),
        description: changes.description.clone().or(cur.description.clone()),
    };
    if let Err(mut errs) = merged.validate(today) {
        // an untouched start date stays valid even once it has aged out of the window
        if changes.start_date.is_none() {
            errs.dismiss("start_date");
        }
        errs.into_result()?;
    }
    let period = merged.period.unwrap_or(cur.period);
    let start = merged.start_date.unwrap_or(cur.start_date);
    let end = period.end_date(start)?;
    conn.execute(
        "UPDATE budgets SET category_id=?1, amount=?2, currency_id=?3, period=?4, start_date=?5,
         end_date=?6, is_active=?7, description=?8 WHERE id=?9",
        params![
            merged.category_id,
            merged.amount.map(|a| a.normalize().to_string()),
            merged.currency_id,
            period.code(),
            start.to_string(),
            end.to_string(),
            changes.is_active.unwrap_or(cur.is_active),
            merged.description.as_deref().filter(|d| !d.is_empty()),
            id
        ],
    )?;
    tracing::info!(id, "budget updated");
    Ok(())
}

pub fn remove(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM budgets WHERE id=?1", params![id])?;
    if n == 0 {
        anyhow::bail!("Budget #{} not found", id);
    }
    tracing::info!(id, "budget removed");
    Ok(())
}

const BUDGET_COLUMNS: &str =
    "id, category_id, amount, currency_id, period, start_date, end_date, is_active, description";

/// Budget columns as stored, before the TEXT amounts and dates are decoded.
struct BudgetRow {
    id: i64,
    category_id: i64,
    amount: String,
    currency_id: i64,
    period: i64,
    start_date: String,
    end_date: String,
    is_active: bool,
    description: Option<String>,
}

impl BudgetRow {
    fn read(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: r.get(0)?,
            category_id: r.get(1)?,
            amount: r.get(2)?,
            currency_id: r.get(3)?,
            period: r.get(4)?,
            start_date: r.get(5)?,
            end_date: r.get(6)?,
            is_active: r.get(7)?,
            description: r.get(8)?,
        })
    }

    fn decode(self) -> Result<Budget> {
        let what = format!("budget #{}", self.id);
        Ok(Budget {
            id: self.id,
            category_id: self.category_id,
            amount: stored_decimal(&self.amount, &what)?,
            currency_id: self.currency_id,
            period: BudgetPeriod::from_code(self.period)
                .with_context(|| format!("Invalid period {} in {}", self.period, what))?,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            is_active: self.is_active,
            description: self.description,
        })
    }
}

pub fn load(conn: &Connection, id: i64) -> Result<Budget> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM budgets WHERE id=?1", BUDGET_COLUMNS),
            params![id],
            BudgetRow::read,
        )
        .optional()?
        .with_context(|| format!("Budget #{} not found", id))?;
    raw.decode()
}

pub fn list(conn: &Connection, include_inactive: bool) -> Result<Vec<Budget>> {
    let sql = format!(
        "SELECT {} FROM budgets {} ORDER BY start_date DESC, id",
        BUDGET_COLUMNS,
        if include_inactive { "" } else { "WHERE is_active=1" }
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], BudgetRow::read)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.decode()?);
    }
    Ok(out)
}

/// Spending in the budget's category and window, in the budget's currency.
pub fn spent_in_window(conn: &Connection, budget: &Budget) -> Result<Decimal> {
    let target = currency_code(conn, budget.currency_id)?;
    let mut stmt = conn.prepare(
        "SELECT t.date, t.amount, c.code FROM transactions t JOIN currencies c ON t.currency_id=c.id
         WHERE t.category_id=?1 AND t.date>=?2 AND t.date<?3",
    )?;
    let mut rows = stmt.query(params![
        budget.category_id,
        budget.start_date.to_string(),
        budget.end_date.to_string()
    ])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let d: String = r.get(0)?;
        let amt_s: String = r.get(1)?;
        let ccy: String = r.get(2)?;
        let date = parse_date(&d)?;
        let amt = stored_decimal(&amt_s, "transactions")?;
        total += fx_convert(conn, date, amt, &ccy, &target)?;
    }
    tracing::debug!(budget = budget.id, %total, "spent in window");
    Ok(total)
}

pub fn summarize(conn: &Connection, budget: &Budget, thresholds: &Thresholds) -> Result<BudgetSummary> {
    let spent = spent_in_window(conn, budget)?;
    let e = evaluate_with(budget.amount, spent, thresholds);
    Ok(BudgetSummary {
        budget_id: budget.id,
        category: category_name(conn, budget.category_id)?,
        currency: currency_code(conn, budget.currency_id)?,
        period: budget.period,
        start_date: budget.start_date,
        end_date: budget.end_date,
        allocated: budget.amount,
        spent,
        remaining: e.remaining,
        percentage_spent: e.percentage_spent,
        status: e.status,
    })
}

pub fn active_summaries(conn: &Connection, thresholds: &Thresholds) -> Result<Vec<BudgetSummary>> {
    list(conn, false)?
        .iter()
        .map(|b| summarize(conn, b, thresholds))
        .collect()
}

/// Budget totals in the home currency, converting at the rate on `on`.
pub fn overview(conn: &Connection, settings: &Settings, on: NaiveDate) -> Result<BudgetOverview> {
    let home = &settings.home_currency;
    let mut entries = Vec::new();
    for s in active_summaries(conn, &settings.thresholds)? {
        let allocated = fx_convert(conn, on, s.allocated, &s.currency, home)?;
        let spent = fx_convert(conn, on, s.spent, &s.currency, home)?;
        entries.push((allocated, spent, s.status));
    }
    Ok(BudgetOverview::from_entries(home, entries))
}

/// How an expense of `amount` in `currency` on `date` would move the active
/// budgets of `category_id`.
pub fn impact_of(
    conn: &Connection,
    category_id: i64,
    date: NaiveDate,
    amount: Decimal,
    currency: &str,
    thresholds: &Thresholds,
) -> Result<ImpactReport> {
    let mut impacts = Vec::new();
    for b in list(conn, false)? {
        if b.category_id != category_id || !b.covers(date) {
            continue;
        }
        let s = summarize(conn, &b, thresholds)?;
        let converted = fx_convert(conn, date, amount, currency, &s.currency)?;
        impacts.push(preview(&s, converted, thresholds));
    }
    Ok(ImpactReport::from_impacts(impacts))
}

pub fn print_impact(report: &ImpactReport) {
    if report.is_empty() {
        println!("No active budget covers this transaction.");
        return;
    }
    let rows = report
        .affected
        .iter()
        .map(|i| {
            let status = if i.status_changed() {
                format!("{} -> {}", i.status_before, i.status_after)
            } else {
                i.status_after.to_string()
            };
            vec![
                i.budget_name.clone(),
                format!(
                    "{} ({})",
                    format_money(i.current_spent, &i.currency_code),
                    format_percent(i.current_percentage)
                ),
                format!(
                    "{} ({})",
                    format_money(i.after_spent, &i.currency_code),
                    format_percent(i.after_percentage)
                ),
                format_money(i.after_remaining, &i.currency_code),
                status,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Budget", "Current", "After Transaction", "Remaining", "Status"],
            rows
        )
    );
    for w in &report.warnings {
        println!("! {}", w);
    }
    let n = report.affected.len();
    println!(
        "{} {} affected{}",
        n,
        if n == 1 { "budget" } else { "budgets" },
        if report.has_warnings() { "; review warnings before saving" } else { "" }
    );
}

fn list_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = list(conn, sub.get_flag("all"))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let mut rows = Vec::new();
    for b in &budgets {
        rows.push(vec![
            b.id.to_string(),
            category_name(conn, b.category_id)?,
            format_money(b.amount, &currency_code(conn, b.currency_id)?),
            b.period.to_string(),
            format_date(b.start_date),
            format_date(b.end_date),
            if b.is_active { "yes" } else { "no" }.to_string(),
            b.description.clone().unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["ID", "Category", "Amount", "Period", "Start", "End", "Active", "Description"],
            rows
        )
    );
    Ok(())
}

fn status_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let summaries = active_summaries(conn, &settings.thresholds)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summaries)? {
        return Ok(());
    }
    let rows = summaries
        .iter()
        .map(|s| {
            let e = s.evaluation();
            let mut pct = format_percent(e.display_percentage());
            if let Some(over) = e.over_by_percentage() {
                pct.push_str(&format!(" (over by {})", format_percent(over)));
            }
            vec![
                s.budget_id.to_string(),
                s.category.clone(),
                s.period.to_string(),
                format!("{} - {}", format_date(s.start_date), format_date(s.end_date)),
                format_money(s.allocated, &s.currency),
                format_money(s.spent, &s.currency),
                format_money(s.remaining, &s.currency),
                pct,
                s.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Category", "Period", "Window", "Budget", "Spent", "Remaining", "Used", "Status"],
            rows
        )
    );
    Ok(())
}

fn alerts_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let summaries = active_summaries(conn, &settings.thresholds)?;
    let alerts = budget_alerts(&summaries);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &alerts)? {
        return Ok(());
    }
    if alerts.is_empty() {
        println!("All budgets on track.");
        return Ok(());
    }
    let rows = alerts
        .iter()
        .map(|a| vec![a.severity.to_string(), a.message.clone(), a.window.clone()])
        .collect();
    println!("{}", pretty_table(&["Severity", "Alert", "Window"], rows));
    println!("Summary: {}", alert_summary_line(&alerts));
    Ok(())
}

fn overview_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let settings = Settings::load(conn)?;
    let ov = overview(conn, &settings, today())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ov)? {
        return Ok(());
    }
    let ccy = &ov.currency;
    let rows = vec![
        vec![
            "Total Budgeted".into(),
            format_money(ov.total_budgeted, ccy),
            format!(
                "{} active {}",
                ov.total_budgets,
                if ov.total_budgets == 1 { "budget" } else { "budgets" }
            ),
        ],
        vec![
            "Total Spent".into(),
            format_money(ov.total_spent, ccy),
            format!("{} of budget used", format_percent(ov.percentage_spent)),
        ],
        vec![
            "Remaining".into(),
            format_money(ov.remaining, ccy),
            if ov.remaining >= Decimal::ZERO { "Available to spend" } else { "Over budget" }.into(),
        ],
        vec![
            "Budgets at Risk".into(),
            ov.budgets_at_risk().to_string(),
            format!("{} over, {} warning", ov.budgets_over_budget, ov.budgets_warning),
        ],
    ];
    println!("{}", pretty_table(&["", "Amount", "Detail"], rows));
    println!("≈ {} budgeted", format_compact(ov.total_budgeted, ccy));
    Ok(())
}
