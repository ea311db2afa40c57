// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Unknown budget period '{0}', expected daily|weekly|monthly|quarterly|yearly or 0-4")]
    Unknown(String),
    #[error("Budget window starting {0} runs past the supported calendar")]
    OutOfRange(NaiveDate),
}

/// Recurring window a budget limit applies to. Codes 0-4 match the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 5] = [
        BudgetPeriod::Daily,
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
        BudgetPeriod::Quarterly,
        BudgetPeriod::Yearly,
    ];

    pub fn code(&self) -> i64 {
        match self {
            BudgetPeriod::Daily => 0,
            BudgetPeriod::Weekly => 1,
            BudgetPeriod::Monthly => 2,
            BudgetPeriod::Quarterly => 3,
            BudgetPeriod::Yearly => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "Daily",
            BudgetPeriod::Weekly => "Weekly",
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Quarterly => "Quarterly",
            BudgetPeriod::Yearly => "Yearly",
        }
    }

    /// First day after the window that opens on `start`.
    pub fn end_date(&self, start: NaiveDate) -> Result<NaiveDate, PeriodError> {
        let end = match self {
            BudgetPeriod::Daily => start.checked_add_days(Days::new(1)),
            BudgetPeriod::Weekly => start.checked_add_days(Days::new(7)),
            BudgetPeriod::Monthly => start.checked_add_months(Months::new(1)),
            BudgetPeriod::Quarterly => start.checked_add_months(Months::new(3)),
            BudgetPeriod::Yearly => start.checked_add_months(Months::new(12)),
        };
        end.ok_or(PeriodError::OutOfRange(start))
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Ok(code) = t.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| PeriodError::Unknown(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| PeriodError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_dates_follow_calendar() {
        let start = ymd(2025, 1, 31);
        assert_eq!(BudgetPeriod::Daily.end_date(start).unwrap(), ymd(2025, 2, 1));
        assert_eq!(BudgetPeriod::Weekly.end_date(start).unwrap(), ymd(2025, 2, 7));
        // clamped to the last day of February
        assert_eq!(BudgetPeriod::Monthly.end_date(start).unwrap(), ymd(2025, 2, 28));
        assert_eq!(BudgetPeriod::Quarterly.end_date(start).unwrap(), ymd(2025, 4, 30));
        assert_eq!(BudgetPeriod::Yearly.end_date(ymd(2024, 2, 29)).unwrap(), ymd(2025, 2, 28));
    }

    #[test]
    fn parses_labels_and_codes() {
        assert_eq!("monthly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Monthly);
        assert_eq!(" Yearly ".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Yearly);
        assert_eq!("3".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Quarterly);
        assert_eq!(
            "5".parse::<BudgetPeriod>(),
            Err(PeriodError::Unknown("5".into()))
        );
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
    }
}
