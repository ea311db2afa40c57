// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display formatting for money, percentages and dates.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub fn currency_symbol(code: &str) -> &str {
    match code {
        "SEK" | "NOK" | "DKK" => "kr",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        _ => code,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

fn render(amount: Decimal, dp: u32, trim_zero: bool) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let s = format!("{:.*}", dp as usize, rounded.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let mut out = format!("{}{}", sign, group_thousands(int));
    if !frac.is_empty() && !(trim_zero && frac.chars().all(|c| c == '0')) {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// `1 234,56 kr`. Unknown currencies print their code as the symbol.
pub fn format_money(amount: Decimal, code: &str) -> String {
    format!("{} {}", render(amount, 2, false), currency_symbol(code))
}

/// Short form for dashboards: `1,2 tn kr`, `3,4 mn kr`, `5,6 md kr`.
pub fn format_compact(amount: Decimal, code: &str) -> String {
    let abs = amount.abs();
    let steps = [
        (Decimal::new(1_000_000_000, 0), "md"),
        (Decimal::new(1_000_000, 0), "mn"),
        (Decimal::new(1_000, 0), "tn"),
    ];
    for (unit, suffix) in steps {
        if abs >= unit {
            return format!(
                "{} {} {}",
                render(amount / unit, 1, true),
                suffix,
                currency_symbol(code)
            );
        }
    }
    format!("{} {}", render(amount, 1, true), currency_symbol(code))
}

pub fn format_percent(p: Decimal) -> String {
    format!("{:.1}%", p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub fn format_date_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_date(start), format_date(end))
}

/// Day-granular relative phrase for `date` as seen from `today`.
pub fn format_relative(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        0 => return "today".into(),
        1 => return "yesterday".into(),
        -1 => return "tomorrow".into(),
        _ => {}
    }
    let (n, unit) = if days.abs() < 30 {
        (days.abs(), "day")
    } else if days.abs() / 30 < 12 {
        (days.abs() / 30, "month")
    } else {
        (days.abs() / 30 / 12, "year")
    };
    let n = n.max(1);
    let plural = if n == 1 { "" } else { "s" };
    if days > 0 {
        format!("{} {}{} ago", n, unit, plural)
    } else {
        format!("in {} {}{}", n, unit, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_and_uses_comma() {
        assert_eq!(format_money(Decimal::new(123456, 2), "SEK"), "1 234,56 kr");
        assert_eq!(format_money(Decimal::new(-2005, 1), "USD"), "-200,50 $");
        assert_eq!(format_money(Decimal::new(1234567890, 0), "EUR"), "1 234 567 890,00 €");
        assert_eq!(format_money(Decimal::ZERO, "CHF"), "0,00 CHF");
        assert_eq!(format_money(Decimal::new(5, 3), "SEK"), "0,01 kr");
    }

    #[test]
    fn compact_forms() {
        assert_eq!(format_compact(Decimal::new(1250, 0), "SEK"), "1,3 tn kr");
        assert_eq!(format_compact(Decimal::new(2_000_000, 0), "SEK"), "2 mn kr");
        assert_eq!(format_compact(Decimal::new(56, 1), "GBP"), "5,6 £");
    }

    #[test]
    fn percent_one_decimal() {
        assert_eq!(format_percent(Decimal::new(85, 0)), "85.0%");
        assert_eq!(format_percent(Decimal::new(33333, 3)), "33.3%");
    }

    #[test]
    fn relative_phrases() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let back = |d: i64| today - chrono::Duration::days(d);
        assert_eq!(format_relative(today, today), "today");
        assert_eq!(format_relative(back(1), today), "yesterday");
        assert_eq!(format_relative(back(3), today), "3 days ago");
        assert_eq!(format_relative(back(-2), today), "in 2 days");
        assert_eq!(format_relative(back(65), today), "2 months ago");
        assert_eq!(format_relative(back(400), today), "1 year ago");
        // 720 days is 24 whole months
        assert_eq!(format_relative(back(720), today), "2 years ago");
        assert_eq!(format_relative(back(800), today), "2 years ago");
    }
}
