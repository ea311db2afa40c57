// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! What a prospective transaction would do to the budgets it lands in.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_money, format_percent};
use crate::models::BudgetSummary;
use crate::status::{BudgetStatus, Thresholds, evaluate_with};

#[derive(Debug, Clone, Serialize)]
pub struct BudgetImpact {
    pub budget_id: i64,
    pub budget_name: String,
    pub currency_code: String,
    pub allocated: Decimal,
    pub current_spent: Decimal,
    pub current_percentage: Decimal,
    pub after_spent: Decimal,
    pub after_percentage: Decimal,
    pub after_remaining: Decimal,
    pub status_before: BudgetStatus,
    pub status_after: BudgetStatus,
    pub will_exceed: bool,
    pub exceed_amount: Decimal,
    pub will_trigger_alert: bool,
    pub alert_message: Option<String>,
}

impl BudgetImpact {
    pub fn status_changed(&self) -> bool {
        self.status_before != self.status_after
    }
}

/// `amount` must already be expressed in the budget's currency.
pub fn preview(summary: &BudgetSummary, amount: Decimal, thresholds: &Thresholds) -> BudgetImpact {
    let before = evaluate_with(summary.allocated, summary.spent, thresholds);
    let after_spent = summary.spent + amount;
    let after = evaluate_with(summary.allocated, after_spent, thresholds);

    let exceed_amount = (after_spent - summary.allocated).max(Decimal::ZERO);
    let will_exceed = exceed_amount > Decimal::ZERO;
    let will_trigger_alert = after.status > before.status && after.status.is_alerting();

    let alert_message = will_trigger_alert.then(|| {
        if after.status == BudgetStatus::OverBudget && will_exceed {
            format!(
                "{} will be over budget by {} ({} spent)",
                summary.category,
                format_money(exceed_amount, &summary.currency),
                format_percent(after.percentage_spent)
            )
        } else {
            format!(
                "{} will reach {} of its budget",
                summary.category,
                format_percent(after.percentage_spent)
            )
        }
    });

    BudgetImpact {
        budget_id: summary.budget_id,
        budget_name: summary.category.clone(),
        currency_code: summary.currency.clone(),
        allocated: summary.allocated,
        current_spent: summary.spent,
        current_percentage: before.percentage_spent,
        after_spent,
        after_percentage: after.percentage_spent,
        after_remaining: after.remaining,
        status_before: before.status,
        status_after: after.status,
        will_exceed,
        exceed_amount,
        will_trigger_alert,
        alert_message,
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImpactReport {
    pub affected: Vec<BudgetImpact>,
    pub warnings: Vec<String>,
}

impl ImpactReport {
    pub fn from_impacts(affected: Vec<BudgetImpact>) -> Self {
        let mut warnings = Vec::new();
        for i in &affected {
            if let Some(msg) = &i.alert_message {
                warnings.push(msg.clone());
            } else if i.status_before == BudgetStatus::OverBudget {
                warnings.push(format!(
                    "{} is already over budget; this adds {}",
                    i.budget_name,
                    format_money(i.after_spent - i.current_spent, &i.currency_code)
                ));
            }
        }
        Self { affected, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.affected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::BudgetPeriod;
    use crate::status::evaluate;
    use chrono::NaiveDate;

    fn summary(allocated: i64, spent: i64) -> BudgetSummary {
        let a = Decimal::from(allocated);
        let s = Decimal::from(spent);
        let e = evaluate(a, s);
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        BudgetSummary {
            budget_id: 7,
            category: "Groceries".into(),
            currency: "SEK".into(),
            period: BudgetPeriod::Monthly,
            start_date: start,
            end_date: BudgetPeriod::Monthly.end_date(start).unwrap(),
            allocated: a,
            spent: s,
            remaining: e.remaining,
            percentage_spent: e.percentage_spent,
            status: e.status,
        }
    }

    #[test]
    fn crossing_into_warning() {
        let i = preview(&summary(1000, 700), Decimal::from(150), &Thresholds::default());
        assert_eq!(i.status_before, BudgetStatus::OnTrack);
        assert_eq!(i.status_after, BudgetStatus::Warning);
        assert_eq!(i.after_remaining, Decimal::from(150));
        assert!(i.will_trigger_alert);
        assert!(!i.will_exceed);
        assert_eq!(
            i.alert_message.as_deref(),
            Some("Groceries will reach 85.0% of its budget")
        );
    }

    #[test]
    fn crossing_over_budget() {
        let i = preview(&summary(1000, 900), Decimal::from(300), &Thresholds::default());
        assert!(i.status_changed());
        assert_eq!(i.exceed_amount, Decimal::from(200));
        assert_eq!(i.after_remaining, Decimal::from(-200));
        assert_eq!(
            i.alert_message.as_deref(),
            Some("Groceries will be over budget by 200,00 kr (120.0% spent)")
        );
    }

    #[test]
    fn staying_on_track_is_quiet() {
        let report = ImpactReport::from_impacts(vec![preview(
            &summary(1000, 100),
            Decimal::from(50),
            &Thresholds::default(),
        )]);
        assert!(!report.has_warnings());
        assert!(!report.affected[0].will_trigger_alert);
    }

    #[test]
    fn already_over_still_warns() {
        let report = ImpactReport::from_impacts(vec![preview(
            &summary(100, 150),
            Decimal::from(10),
            &Thresholds::default(),
        )]);
        assert!(!report.affected[0].will_trigger_alert);
        assert_eq!(
            report.warnings,
            vec!["Groceries is already over budget; this adds 10,00 kr".to_string()]
        );
    }
}
