// src/filter/predicate.rs

use anyhow::{anyhow, Result};
use arrow::{
    array::{Array, BooleanArray, Date32Array, Float64Array, StringArray},
    compute,
    record_batch::RecordBatch,
};
use chrono::{Months, NaiveDate};
use regex::Regex;

use crate::config::ZoneSet;
use crate::load::date_parser;

/// Fetch a canonical column and downcast it to its concrete array type.
pub fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("column `{}` not found in sales batch", name))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("column `{}` has unexpected type", name))
}

/// `min <= v <= max`; nulls fail.
pub fn in_range(arr: &Float64Array, min: f64, max: f64) -> BooleanArray {
    arr.iter()
        .map(|v| Some(v.is_some_and(|v| v >= min && v <= max)))
        .collect()
}

/// Regex match on text; nulls fail.
pub fn matches(arr: &StringArray, re: &Regex) -> BooleanArray {
    arr.iter()
        .map(|v| Some(v.is_some_and(|s| re.is_match(s))))
        .collect()
}

/// Sold on or after `cutoff`; undated rows fail.
pub fn sold_since(arr: &Date32Array, cutoff: NaiveDate) -> BooleanArray {
    let cutoff = date_parser::to_date32(cutoff);
    arr.iter()
        .map(|v| Some(v.is_some_and(|d| d >= cutoff)))
        .collect()
}

/// Zone membership; missing zones fail.
pub fn in_zones(arr: &StringArray, zones: &ZoneSet) -> BooleanArray {
    arr.iter()
        .map(|v| Some(v.is_some_and(|z| zones.contains(z))))
        .collect()
}

/// `today` minus `months` calendar months, clamped to month end
/// (e.g. 2024-03-31 − 1 month = 2024-02-29).
pub fn lookback_cutoff(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// AND together every mask; an empty list keeps all `len` rows.
pub fn all_of(masks: Vec<BooleanArray>, len: usize) -> Result<BooleanArray> {
    let mut acc = BooleanArray::from(vec![true; len]);
    for m in masks {
        acc = compute::and(&acc, &m)?;
    }
    Ok(acc)
}
