use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn round_half_up(value: f64, scale: f64) -> f64 {
    (value * scale + 0.5).floor() / scale
}

pub fn round_cents(value: f64) -> f64 {
    round_half_up(value, 100.0)
}

pub fn round_one_decimal(value: f64) -> f64 {
    round_half_up(value, 10.0)
}

pub fn format_decimal(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn parse_decimal(value: &str) -> Result<f64> {
    let parsed = value
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| anyhow!("Parse decimal: {}", e))?;
    if !parsed.is_finite() {
        return Err(anyhow!("Parse decimal: not a finite number"));
    }
    Ok(parsed)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    let formats = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Short US-locale rendering, e.g. `1/31/2024`.
pub fn format_us_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Long rendering used on detail views, e.g. `January 31, 2024`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_money(symbol: &str, value: f64) -> String {
    format!("{} {}", symbol, format_decimal(value))
}
