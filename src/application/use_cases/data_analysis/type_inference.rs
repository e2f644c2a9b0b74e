use crate::domain::analysis::{DataType, ScalarValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// `1,234` / `-12,345.67`: comma-grouped thousands, nothing else.
static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Plain or comma-grouped decimal text. `NaN` and infinities are not numbers here.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = match trimmed.parse::<f64>() {
        Ok(n) => Some(n),
        Err(_) if GROUPED_NUMBER.is_match(trimmed) => trimmed.replace(',', "").parse::<f64>().ok(),
        Err(_) => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Parse the recognised date/time spellings. Naive values are taken as UTC.
pub fn parse_date_time(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// `true`/`false` in any case
pub fn parse_boolean(text: &str) -> Option<bool> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") {
        Some(true)
    } else if t.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Finite native numbers, or strings that parse as one
pub fn is_numeric(value: &ScalarValue) -> bool {
    match value {
        ScalarValue::Number(n) => n.is_finite(),
        ScalarValue::String(s) => parse_number(s).is_some(),
        _ => false,
    }
}

pub fn is_date_time(value: &ScalarValue) -> bool {
    match value {
        ScalarValue::DateTime(_) => true,
        ScalarValue::String(s) => parse_date_time(s).is_some(),
        _ => false,
    }
}

/// Native booleans, or the strings `true`/`false` in any case. `0`/`1` are not booleans.
pub fn is_boolean(value: &ScalarValue) -> bool {
    match value {
        ScalarValue::Bool(_) => true,
        ScalarValue::String(s) => parse_boolean(s).is_some(),
        _ => false,
    }
}

/// At least one non-null value, and every non-null value numeric
pub fn is_numeric_column<'a, I>(values: I) -> bool
where
    I: IntoIterator<Item = &'a ScalarValue>,
{
    let mut seen = false;
    for value in values.into_iter().filter(|v| !v.is_null()) {
        if !is_numeric(value) {
            return false;
        }
        seen = true;
    }
    seen
}

/// Numeric view of a value; `None` for anything `is_numeric` rejects
pub fn to_f64(value: &ScalarValue) -> Option<f64> {
    match value {
        ScalarValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
        ScalarValue::String(s) => parse_number(s),
        _ => None,
    }
}

/// Classify a column. Nulls are ignored; the checks run in a fixed priority
/// order (numeric, datetime, boolean) so `"0"`/`"1"` columns are numeric.
pub fn determine_data_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a ScalarValue>,
{
    let non_null: Vec<&ScalarValue> = values.into_iter().filter(|v| !v.is_null()).collect();
    if non_null.is_empty() {
        return DataType::Unknown;
    }

    if non_null.iter().all(|v| is_numeric(v)) {
        DataType::Numeric
    } else if non_null.iter().all(|v| is_date_time(v)) {
        DataType::DateTime
    } else if non_null.iter().all(|v| is_boolean(v)) {
        DataType::Boolean
    } else {
        DataType::String
    }
}
