use crate::config::LoadConfig;
use crate::load::schema::normalized_schema;
use crate::load::{date_parser, utils, RawTable};
use anyhow::{bail, Result};
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Array, Float64Builder, StringArray, StringBuilder},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cells that had text but failed to coerce, per canonical column.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoercionReport {
    pub living_area: usize,
    pub bedrooms: usize,
    pub bathrooms: usize,
    pub lot_acres: usize,
    pub price: usize,
    pub sold_date: usize,
}

impl CoercionReport {
    pub fn total(&self) -> usize {
        self.living_area
            + self.bedrooms
            + self.bathrooms
            + self.lot_acres
            + self.price
            + self.sold_date
    }
}

/// Resolve a header name to its index, case-sensitively after cleaning.
fn header_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Cell `idx` of `row`; short rows read as blank.
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

fn numeric_column(raw: &RawTable, idx: usize, strip: &str, bad: &mut usize) -> Float64Array {
    let mut b = Float64Builder::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let s = cell(row, idx);
        let v = utils::parse_number(s, strip);
        if v.is_none() && !utils::clean_str(s).is_empty() {
            *bad += 1;
        }
        b.append_option(v);
    }
    b.finish()
}

/// `num / den`, null when either side is null or `den` is zero.
pub fn ratio(num: &Float64Array, den: &Float64Array) -> Float64Array {
    num.iter()
        .zip(den.iter())
        .map(|(n, d)| match (n, d) {
            (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|v| v.is_finite()),
            _ => None,
        })
        .collect()
}

/// Convert a raw all-text table into the typed, normalized sales batch.
///
/// Fails only when a configured header is absent; bad cells become nulls.
pub fn normalize(raw: &RawTable, cfg: &LoadConfig) -> Result<(RecordBatch, CoercionReport)> {
    let names = &cfg.columns;
    let missing: Vec<&str> = names
        .required()
        .into_iter()
        .filter(|name| header_index(&raw.headers, name).is_none())
        .collect();
    if !missing.is_empty() {
        bail!(
            "source is missing required column(s): {} (found: {})",
            missing.join(", "),
            raw.headers.join(", ")
        );
    }
    // presence checked above
    let idx = |name: &String| header_index(&raw.headers, name).unwrap_or_default();

    let strip = cfg.numeric_strip.as_str();
    let mut report = CoercionReport::default();

    let living_area = numeric_column(raw, idx(&names.living_area), strip, &mut report.living_area);
    let bedrooms = numeric_column(raw, idx(&names.bedrooms), strip, &mut report.bedrooms);
    let bathrooms = numeric_column(raw, idx(&names.bathrooms), strip, &mut report.bathrooms);
    let lot_acres = numeric_column(raw, idx(&names.lot_acres), strip, &mut report.lot_acres);
    let price = numeric_column(raw, idx(&names.price), strip, &mut report.price);

    let date_idx = idx(&names.sold_date);
    let mut dates = Date32Builder::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let s = utils::clean_str(cell(row, date_idx));
        let d = date_parser::parse_sale_date(&s, &cfg.date_formats);
        if d.is_none() && !s.is_empty() {
            report.sold_date += 1;
        }
        dates.append_option(d.map(date_parser::to_date32));
    }

    let type_idx = idx(&names.property_type);
    let property_type: StringArray = raw
        .rows
        .iter()
        .map(|row| Some(utils::clean_str(cell(row, type_idx))).filter(|s| !s.is_empty()))
        .collect();

    let zone_idx = idx(&names.zone);
    let zone: StringArray = raw
        .rows
        .iter()
        .map(|row| utils::normalize_zone(cell(row, zone_idx)))
        .collect();

    let price_per_sqft = ratio(&price, &living_area);
    let price_per_acre = ratio(&price, &lot_acres);

    let required = names.required();
    let passthrough: Vec<(usize, String)> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !required.contains(&h.as_str()))
        .map(|(i, h)| (i, h.clone()))
        .collect();

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(property_type),
        Arc::new(living_area),
        Arc::new(bedrooms),
        Arc::new(bathrooms),
        Arc::new(lot_acres),
        Arc::new(price),
        Arc::new(dates.finish()),
        Arc::new(zone),
        Arc::new(price_per_sqft),
        Arc::new(price_per_acre),
    ];
    for (i, _) in &passthrough {
        let mut b = StringBuilder::new();
        for row in &raw.rows {
            b.append_option(row.get(*i));
        }
        columns.push(Arc::new(b.finish()));
    }

    let extra: Vec<String> = passthrough.into_iter().map(|(_, h)| h).collect();
    let schema = Arc::new(normalized_schema(&extra));
    let batch = RecordBatch::try_new(schema, columns)?;

    debug!(
        rows = batch.num_rows(),
        passthrough = extra.len(),
        "normalized sales table"
    );
    if report.total() > 0 {
        warn!(?report, "unparseable cells coerced to null");
    }
    Ok((batch, report))
}
