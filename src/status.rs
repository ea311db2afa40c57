// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget status derivation: percentage spent, remaining amount and the
//! On Track / Warning / Over Budget classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Spend-health of a budget, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "On Track",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::OverBudget => "Over Budget",
        }
    }

    pub fn is_alerting(&self) -> bool {
        !matches!(self, BudgetStatus::OnTrack)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("Threshold must be greater than zero, got {0}")]
    NotPositive(Decimal),
    #[error("Warning threshold {warning} cannot exceed over-budget threshold {over}")]
    Inverted { warning: Decimal, over: Decimal },
}

/// Percentage cut-offs for `Warning` and `OverBudget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    warning: Decimal,
    over: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: Decimal::new(80, 0),
            over: Decimal::ONE_HUNDRED,
        }
    }
}

impl Thresholds {
    pub fn new(warning: Decimal, over: Decimal) -> Result<Self, ThresholdError> {
        for t in [warning, over] {
            if t <= Decimal::ZERO {
                return Err(ThresholdError::NotPositive(t));
            }
        }
        if warning > over {
            return Err(ThresholdError::Inverted { warning, over });
        }
        Ok(Self { warning, over })
    }

    pub fn warning(&self) -> Decimal {
        self.warning
    }

    pub fn over(&self) -> Decimal {
        self.over
    }

    pub fn classify(&self, percentage_spent: Decimal) -> BudgetStatus {
        if percentage_spent >= self.over {
            BudgetStatus::OverBudget
        } else if percentage_spent >= self.warning {
            BudgetStatus::Warning
        } else {
            BudgetStatus::OnTrack
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetEvaluation {
    pub percentage_spent: Decimal,
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

impl BudgetEvaluation {
    /// Percentage clamped to 100 for progress bars.
    pub fn display_percentage(&self) -> Decimal {
        self.percentage_spent.min(Decimal::ONE_HUNDRED).round_dp(1)
    }

    /// How far past 100% the budget is, if at all.
    pub fn over_by_percentage(&self) -> Option<Decimal> {
        let pct = self.percentage_spent.round_dp(1);
        (pct > Decimal::ONE_HUNDRED).then(|| pct - Decimal::ONE_HUNDRED)
    }
}

/// Evaluate with the default 80% / 100% thresholds.
pub fn evaluate(allocated: Decimal, spent: Decimal) -> BudgetEvaluation {
    evaluate_with(allocated, spent, &Thresholds::default())
}

/// Callers validate that neither amount is negative.
pub fn evaluate_with(allocated: Decimal, spent: Decimal, thresholds: &Thresholds) -> BudgetEvaluation {
    let percentage_spent = percentage_of(spent, allocated);
    BudgetEvaluation {
        percentage_spent,
        remaining: allocated - spent,
        status: thresholds.classify(percentage_spent),
    }
}

/// `part / whole * 100`, or zero for an empty whole.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        (part / whole * Decimal::ONE_HUNDRED).normalize()
    } else {
        Decimal::ZERO
    }
}
