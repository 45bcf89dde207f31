// src/load/mod.rs
pub mod convert;
pub mod date_parser;
pub mod schema;
pub mod utils;

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;
use std::{fs::File, io::BufReader, io::Read, path::Path};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::LoadConfig;
use crate::filter::{self, ImprovedCriteria, LandCriteria};
pub use convert::CoercionReport;

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Cleaned header names, in file order.
    pub headers: Vec<String>,
    /// Every data row as text; short rows stay short, long rows are cut to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

/// Read CSV text into a [`RawTable`] without interpreting any cell.
///
/// Invalid UTF-8 is replaced rather than rejected so a single bad byte never
/// drops a row.
pub fn read_raw_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()
        .context("reading CSV header row")?
        .iter()
        .map(|h| utils::clean_str(&String::from_utf8_lossy(h)))
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV read error at record {}", idx))?;
        let mut row: Vec<String> = record
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect();
        row.truncate(headers.len());
        rows.push(row);
    }
    debug!(columns = headers.len(), rows = rows.len(), "read raw table");

    Ok(RawTable { headers, rows })
}

/// The normalized, typed sales table. Immutable once built; every filter
/// call hands back a fresh batch.
#[derive(Debug, Clone)]
pub struct SalesTable {
    batch: RecordBatch,
    report: CoercionReport,
}

impl SalesTable {
    pub fn from_reader<R: Read>(reader: R, cfg: &LoadConfig) -> Result<Self> {
        let raw = read_raw_table(reader)?;
        let (batch, report) = convert::normalize(&raw, cfg)?;
        Ok(Self { batch, report })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Per-column count of cells that were present but unparseable.
    pub fn coercions(&self) -> &CoercionReport {
        &self.report
    }

    pub fn improved(&self, criteria: &ImprovedCriteria) -> Result<RecordBatch> {
        self.improved_at(criteria, &SystemClock)
    }

    pub fn improved_at(
        &self,
        criteria: &ImprovedCriteria,
        clock: &dyn Clock,
    ) -> Result<RecordBatch> {
        filter::filter_improved(&self.batch, criteria, clock)
    }

    pub fn land(&self, criteria: &LandCriteria) -> Result<RecordBatch> {
        self.land_at(criteria, &SystemClock)
    }

    pub fn land_at(&self, criteria: &LandCriteria, clock: &dyn Clock) -> Result<RecordBatch> {
        filter::filter_land(&self.batch, criteria, clock)
    }
}

/// Open `path` and build the normalized [`SalesTable`].
///
/// An unreadable file or a missing required column is fatal; bad cells are not.
#[tracing::instrument(level = "info", skip(path, cfg), fields(path = %path.as_ref().display()))]
pub fn load_sales<P: AsRef<Path>>(path: P, cfg: &LoadConfig) -> Result<SalesTable> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open sales file: {:?}", path.as_ref()))?;
    let table = SalesTable::from_reader(BufReader::new(file), cfg)
        .with_context(|| format!("Failed to load sales from {:?}", path.as_ref()))?;
    info!(
        rows = table.num_rows(),
        coerced = table.coercions().total(),
        "loaded sales"
    );
    Ok(table)
}
