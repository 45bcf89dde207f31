// src/summary.rs

use anyhow::Result;
use arrow::{array::Float64Array, record_batch::RecordBatch};
use serde::Serialize;
use std::fmt;

use crate::filter::predicate::column;
use crate::load::schema::col;

/// Descriptive statistics for one filtered segment.
///
/// `None` means the statistic is undefined (no non-null input values); it is
/// never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub median_price: Option<f64>,
    pub mean_price: Option<f64>,
    pub median_price_per_sqft: Option<f64>,
    pub median_price_per_acre: Option<f64>,
    pub median_acres: Option<f64>,
}

fn present(arr: &Float64Array) -> Vec<f64> {
    arr.iter().flatten().filter(|v| !v.is_nan()).collect()
}

/// Median of the non-null values; the mean of the middle pair for even counts.
pub fn median(arr: &Float64Array) -> Option<f64> {
    let mut values = present(arr);
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

pub fn mean(arr: &Float64Array) -> Option<f64> {
    let values = present(arr);
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn summarize(batch: &RecordBatch) -> Result<Summary> {
    let price = column::<Float64Array>(batch, col::PRICE)?;
    Ok(Summary {
        count: batch.num_rows(),
        median_price: median(price),
        mean_price: mean(price),
        median_price_per_sqft: median(column::<Float64Array>(batch, col::PRICE_PER_SQFT)?),
        median_price_per_acre: median(column::<Float64Array>(batch, col::PRICE_PER_ACRE)?),
        median_acres: median(column::<Float64Array>(batch, col::LOT_ACRES)?),
    })
}

struct Stat(Option<f64>);

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.2}", v),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Count:            {}", self.count)?;
        writeln!(f, "Median Price:     {}", Stat(self.median_price))?;
        writeln!(f, "Mean Price:       {}", Stat(self.mean_price))?;
        writeln!(f, "Median $/sf:      {}", Stat(self.median_price_per_sqft))?;
        writeln!(f, "Median $/acre:    {}", Stat(self.median_price_per_acre))?;
        write!(f, "Median Acres:     {}", Stat(self.median_acres))
    }
}
