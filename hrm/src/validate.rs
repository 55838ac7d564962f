//! Field-level checks shared by the write paths.

use sea_orm::prelude::Json;
use serde_json::Value;

use crate::error::{HrmError, HrmResult};

const MAX_PAGE: i32 = 200;

pub(crate) fn normalize_email(field: &str, value: &str) -> HrmResult<String> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(HrmError::validation(format!("Invalid {}", field)));
    }
    Ok(trimmed)
}

pub(crate) fn require_text(field: &str, value: &str, max: usize) -> HrmResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrmError::validation(format!("{} is required", field)));
    }
    length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

pub(crate) fn optional_text(
    field: &str,
    value: Option<String>,
    max: usize,
) -> HrmResult<Option<String>> {
    match value {
        Some(text) => {
            length(field, &text, max)?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

fn length(field: &str, value: &str, max: usize) -> HrmResult<()> {
    if value.chars().count() > max {
        return Err(HrmError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

pub(crate) fn non_negative(field: &str, value: f64) -> HrmResult<f64> {
    if value < 0.0 || !value.is_finite() {
        return Err(HrmError::validation(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

pub(crate) fn non_negative_days(field: &str, value: i32) -> HrmResult<i32> {
    if value < 0 {
        return Err(HrmError::validation(format!("{} cannot be negative", field)));
    }
    Ok(value)
}

pub(crate) fn rating(field: &str, value: i16) -> HrmResult<i16> {
    if !(1..=5).contains(&value) {
        return Err(HrmError::validation(format!(
            "{} rating must be between 1 and 5",
            field
        )));
    }
    Ok(value)
}

pub(crate) fn pay_period(month: i16, year: i32) -> HrmResult<()> {
    if !(1..=12).contains(&month) {
        return Err(HrmError::validation("month must be between 1 and 12"));
    }
    if year < 2020 {
        return Err(HrmError::validation("year must be 2020 or later"));
    }
    Ok(())
}

/// Non-empty list of non-blank strings, stored as a JSON array.
pub(crate) fn require_list(field: &str, values: Vec<String>) -> HrmResult<Json> {
    let cleaned: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(HrmError::validation(format!("{} are required", field)));
    }
    Ok(string_list(cleaned))
}

pub(crate) fn string_list(values: Vec<String>) -> Json {
    Value::Array(values.into_iter().map(Value::String).collect())
}

/// Clamped pagination window, as (limit, offset).
pub(crate) fn page_window(first: Option<i32>, offset: Option<i32>) -> (u64, u64) {
    let limit = first.unwrap_or(50).clamp(1, MAX_PAGE) as u64;
    let skip = offset.unwrap_or(0).max(0) as u64;
    (limit, skip)
}
