// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Field-level input rules shared by transactions, budgets and feedback.
//! Every check records at most one message per field.

use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

pub fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999, 2)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        if !self.has(field) {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn dismiss(&mut self, field: &str) {
        self.errors.retain(|e| e.field != field);
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Length and presence rule for a free-text field.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub name: &'static str,
    pub required: bool,
    pub min: usize,
    pub max: usize,
}

impl TextRule {
    pub const fn required(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            required: true,
            min,
            max,
        }
    }

    pub const fn optional(name: &'static str, max: usize) -> Self {
        Self {
            name,
            required: false,
            min: 0,
            max,
        }
    }
}

pub fn check_text(errs: &mut ValidationErrors, field: &'static str, value: Option<&str>, rule: TextRule) {
    let name = rule.name;
    let v = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            if rule.required {
                errs.push(field, format!("{} is required.", name));
            }
            return;
        }
    };
    if v.starts_with(' ') {
        errs.push(field, format!("{} cannot have leading spaces.", name));
    } else if v.ends_with(' ') {
        errs.push(field, format!("{} cannot have trailing spaces.", name));
    } else if v.contains("  ") {
        errs.push(field, format!("{} cannot have multiple consecutive spaces.", name));
    } else if rule.required && v.chars().count() < rule.min {
        errs.push(
            field,
            format!("{} must be at least {} characters long.", name, rule.min),
        );
    } else if v.chars().count() > rule.max {
        errs.push(
            field,
            format!("{} cannot be more than {} characters.", name, rule.max),
        );
    }
}

pub fn check_amount(errs: &mut ValidationErrors, field: &'static str, name: &str, amount: Option<Decimal>) {
    let Some(a) = amount else {
        errs.push(field, format!("{} is required.", name));
        return;
    };
    if a < min_amount() {
        errs.push(field, format!("{} must be at least 0.01.", name));
    } else if a > max_amount() {
        errs.push(field, format!("{} cannot exceed 999,999,999.99.", name));
    } else if a.normalize().scale() > 2 {
        errs.push(field, format!("{} can have at most 2 decimal places.", name));
    }
}

pub fn check_id(errs: &mut ValidationErrors, field: &'static str, name: &str, id: Option<i64>) {
    match id {
        None => errs.push(field, format!("{} is required.", name)),
        Some(v) if v < 1 => errs.push(
            field,
            format!("Valid {} must be selected.", name.to_lowercase()),
        ),
        Some(_) => {}
    }
}

/// Dates on or before `today`.
pub fn check_past_date(
    errs: &mut ValidationErrors,
    field: &'static str,
    name: &str,
    date: Option<NaiveDate>,
    today: NaiveDate,
) {
    match date {
        None => errs.push(field, format!("{} is required.", name)),
        Some(d) if d > today => errs.push(field, format!("{} cannot be in the future.", name)),
        Some(_) => {}
    }
}

/// Budget windows may open up to two months back and twelve months ahead.
pub fn check_budget_start(
    errs: &mut ValidationErrors,
    field: &'static str,
    name: &str,
    date: Option<NaiveDate>,
    today: NaiveDate,
) {
    let Some(d) = date else {
        errs.push(field, format!("{} is required.", name));
        return;
    };
    let earliest = today.checked_sub_months(Months::new(2)).unwrap_or(NaiveDate::MIN);
    let latest = today.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX);
    if d < earliest {
        errs.push(field, format!("{} cannot be older than 2 months.", name));
    } else if d > latest {
        errs.push(
            field,
            format!("{} cannot be more than 12 months in the future.", name),
        );
    }
}

pub fn check_currency_code(errs: &mut ValidationErrors, field: &'static str, code: &str) {
    if !CURRENCY_CODE.is_match(code) {
        errs.push(
            field,
            format!("Currency code '{}' must be three upper-case letters.", code),
        );
    }
}

/// Choice among a fixed set of integer codes.
pub fn check_choice(
    errs: &mut ValidationErrors,
    field: &'static str,
    name: &str,
    value: Option<i64>,
    allowed: &[i64],
) {
    match value {
        None => errs.push(field, format!("{} is required.", name)),
        Some(v) if !allowed.contains(&v) => errs.push(
            field,
            format!("Valid {} must be selected.", name.to_lowercase()),
        ),
        Some(_) => {}
    }
}
