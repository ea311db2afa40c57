// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::BudgetPeriod;
use crate::status::{BudgetEvaluation, BudgetStatus};
use crate::validation::{
    TextRule, ValidationErrors, check_amount, check_budget_start, check_choice, check_id,
    check_past_date, check_text,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency_id: i64,
    pub category_id: i64,
    pub description: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub amount: Decimal,
    pub currency_id: i64,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub description: Option<String>,
}

impl Budget {
    /// Whether `date` falls in this budget's window.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date < self.end_date
    }
}

/// A budget joined with its spending, as shown by `budget status`.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummary {
    pub budget_id: i64,
    pub category: String,
    pub currency: String,
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage_spent: Decimal,
    pub status: BudgetStatus,
}

impl BudgetSummary {
    pub fn evaluation(&self) -> BudgetEvaluation {
        BudgetEvaluation {
            percentage_spent: self.percentage_spent,
            remaining: self.remaining,
            status: self.status,
        }
    }
}

macro_rules! coded_enum {
    ($name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const CODES: &'static [i64] = &[$($code),+];

            pub fn code(&self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Accepts the numeric code, the label, or the variant name.
            pub fn parse(s: &str) -> Option<Self> {
                let t = s.trim();
                if let Ok(code) = t.parse::<i64>() {
                    return Self::from_code(code);
                }
                let squash = |x: &str| x.to_ascii_lowercase().replace([' ', '-', '_'], "");
                let want = squash(t);
                [$(($name::$variant, stringify!($variant))),+]
                    .into_iter()
                    .find(|(v, n)| squash(v.label()) == want || squash(n) == want)
                    .map(|(v, _)| v)
            }
        }
    };
}

coded_enum!(FeedbackType {
    Bug = 1 => "Bug Report",
    Feature = 2 => "Feature Request",
    Improvement = 3 => "Improvement",
    Question = 4 => "Question",
    Complaint = 5 => "Complaint",
});

coded_enum!(FeedbackPriority {
    Low = 1 => "Low",
    Medium = 2 => "Medium",
    High = 3 => "High",
    Critical = 4 => "Critical",
});

coded_enum!(FeedbackStatus {
    Open = 1 => "Open",
    InProgress = 2 => "In Progress",
    Responded = 3 => "Responded",
    Resolved = 4 => "Resolved",
    Closed = 5 => "Closed",
});

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub id: i64,
    pub kind: FeedbackType,
    pub priority: FeedbackPriority,
    pub subject: String,
    pub description: String,
    pub status: FeedbackStatus,
    pub created_at: NaiveDateTime,
}

/// Transaction fields as entered, before they are stored.
#[derive(Debug, Clone, Default)]
pub struct NewTransaction {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub currency_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_amount(&mut errs, "amount", "Amount", self.amount);
        check_text(
            &mut errs,
            "description",
            self.description.as_deref(),
            TextRule::required("Description", 3, 500),
        );
        check_id(&mut errs, "category_id", "Category", self.category_id);
        check_id(&mut errs, "currency_id", "Currency", self.currency_id);
        check_past_date(&mut errs, "date", "Transaction date", self.date, today);
        check_text(
            &mut errs,
            "notes",
            self.notes.as_deref(),
            TextRule::optional("Notes", 1000),
        );
        errs.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewBudget {
    pub category_id: Option<i64>,
    pub amount: Option<Decimal>,
    pub currency_id: Option<i64>,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl NewBudget {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_id(&mut errs, "category_id", "Category", self.category_id);
        check_amount(&mut errs, "amount", "Budget amount", self.amount);
        check_id(&mut errs, "currency_id", "Currency", self.currency_id);
        if self.period.is_none() {
            errs.push("period", "Budget period is required.");
        }
        check_budget_start(&mut errs, "start_date", "Start date", self.start_date, today);
        check_text(
            &mut errs,
            "description",
            self.description.as_deref(),
            TextRule::optional("Description", 500),
        );
        errs.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewFeedback {
    pub kind: Option<i64>,
    pub priority: Option<i64>,
    pub subject: Option<String>,
    pub description: Option<String>,
}

impl NewFeedback {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::new();
        check_choice(&mut errs, "type", "Feedback type", self.kind, FeedbackType::CODES);
        check_text(
            &mut errs,
            "subject",
            self.subject.as_deref(),
            TextRule::required("Subject", 5, 200),
        );
        check_text(
            &mut errs,
            "description",
            self.description.as_deref(),
            TextRule::required("Description", 10, 2000),
        );
        check_choice(&mut errs, "priority", "Priority", self.priority, FeedbackPriority::CODES);
        errs.into_result()
    }
}
