// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_date_range, format_money};
use crate::models::BudgetSummary;
use crate::status::{BudgetStatus, percentage_of};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetAlert {
    pub budget_id: i64,
    pub severity: BudgetStatus,
    pub message: String,
    pub window: String,
}

/// Over-budget alerts first, then warnings; input order is kept within each group.
pub fn budget_alerts(summaries: &[BudgetSummary]) -> Vec<BudgetAlert> {
    let over = summaries
        .iter()
        .filter(|s| s.status == BudgetStatus::OverBudget)
        .map(|s| BudgetAlert {
            budget_id: s.budget_id,
            severity: s.status,
            message: format!(
                "{} is over budget by {} ({:.1}%)",
                s.category,
                format_money(s.remaining.abs(), &s.currency),
                (s.percentage_spent - Decimal::ONE_HUNDRED).round_dp(1)
            ),
            window: format_date_range(s.start_date, s.end_date),
        });
    let warning = summaries
        .iter()
        .filter(|s| s.status == BudgetStatus::Warning)
        .map(|s| BudgetAlert {
            budget_id: s.budget_id,
            severity: s.status,
            message: format!(
                "{} is at {:.1}% spent with {} remaining",
                s.category,
                s.percentage_spent.round_dp(1),
                format_money(s.remaining, &s.currency)
            ),
            window: format_date_range(s.start_date, s.end_date),
        });
    over.chain(warning).collect()
}

pub fn alert_summary_line(alerts: &[BudgetAlert]) -> String {
    let over = alerts
        .iter()
        .filter(|a| a.severity == BudgetStatus::OverBudget)
        .count();
    let warn = alerts
        .iter()
        .filter(|a| a.severity == BudgetStatus::Warning)
        .count();
    format!("{} over budget, {} approaching limit", over, warn)
}

/// Totals across active budgets, in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    pub currency: String,
    pub total_budgeted: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub percentage_spent: Decimal,
    pub total_budgets: usize,
    pub budgets_warning: usize,
    pub budgets_over_budget: usize,
}

impl BudgetOverview {
    /// Each entry is (allocated, spent, status) already converted to `currency`.
    pub fn from_entries<I>(currency: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (Decimal, Decimal, BudgetStatus)>,
    {
        let mut ov = BudgetOverview {
            currency: currency.to_string(),
            total_budgeted: Decimal::ZERO,
            total_spent: Decimal::ZERO,
            remaining: Decimal::ZERO,
            percentage_spent: Decimal::ZERO,
            total_budgets: 0,
            budgets_warning: 0,
            budgets_over_budget: 0,
        };
        for (allocated, spent, status) in entries {
            ov.total_budgeted += allocated;
            ov.total_spent += spent;
            ov.total_budgets += 1;
            match status {
                BudgetStatus::Warning => ov.budgets_warning += 1,
                BudgetStatus::OverBudget => ov.budgets_over_budget += 1,
                BudgetStatus::OnTrack => {}
            }
        }
        ov.remaining = ov.total_budgeted - ov.total_spent;
        ov.percentage_spent = percentage_of(ov.total_spent, ov.total_budgeted);
        ov
    }

    pub fn budgets_at_risk(&self) -> usize {
        self.budgets_warning + self.budgets_over_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::BudgetPeriod;
    use crate::status::evaluate;
    use chrono::NaiveDate;

    fn summary(id: i64, name: &str, allocated: i64, spent: i64) -> BudgetSummary {
        let (a, s) = (Decimal::from(allocated), Decimal::from(spent));
        let e = evaluate(a, s);
        BudgetSummary {
            budget_id: id,
            category: name.into(),
            currency: "SEK".into(),
            period: BudgetPeriod::Monthly,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            allocated: a,
            spent: s,
            remaining: e.remaining,
            percentage_spent: e.percentage_spent,
            status: e.status,
        }
    }

    #[test]
    fn over_budget_listed_before_warnings() {
        let list = vec![
            summary(1, "Dining", 1000, 900),
            summary(2, "Rent", 100, 100),
            summary(3, "Travel", 500, 10),
            summary(4, "Fuel", 200, 250),
        ];
        let alerts = budget_alerts(&list);
        let ids: Vec<i64> = alerts.iter().map(|a| a.budget_id).collect();
        assert_eq!(ids, vec![2, 4, 1]);
        assert_eq!(alerts[1].message, "Fuel is over budget by 50,00 kr (25.0%)");
        assert_eq!(
            alerts[2].message,
            "Dining is at 90.0% spent with 100,00 kr remaining"
        );
        assert_eq!(alerts[2].window, "2025-05-01 - 2025-06-01");
        assert_eq!(alert_summary_line(&alerts), "2 over budget, 1 approaching limit");
    }

    #[test]
    fn overview_totals() {
        let ov = BudgetOverview::from_entries(
            "SEK",
            vec![
                (Decimal::from(1000), Decimal::from(500), BudgetStatus::OnTrack),
                (Decimal::from(1000), Decimal::from(1100), BudgetStatus::OverBudget),
            ],
        );
        assert_eq!(ov.total_budgeted, Decimal::from(2000));
        assert_eq!(ov.remaining, Decimal::from(400));
        assert_eq!(ov.percentage_spent, Decimal::from(80));
        assert_eq!(ov.budgets_at_risk(), 1);
    }

    #[test]
    fn empty_overview_has_zero_percent() {
        let ov = BudgetOverview::from_entries("SEK", Vec::new());
        assert_eq!(ov.percentage_spent, Decimal::ZERO);
        assert_eq!(ov.total_budgets, 0);
    }
}
