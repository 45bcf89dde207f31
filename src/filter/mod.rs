// src/filter/mod.rs
pub mod predicate;

use anyhow::Result;
use arrow::{
    array::{Date32Array, Float64Array, StringArray},
    compute::filter_record_batch,
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::config::ZoneSet;
use crate::load::schema::col;
use predicate::{all_of, column, in_range, in_zones, lookback_cutoff, matches, sold_since};

static SINGLE_FAMILY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)single").expect("single-family pattern"));
static LAND_OR_LOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)land|lot").expect("land pattern"));

/// Comparable improved (single-family) sales.
#[derive(Debug, Clone, PartialEq)]
pub struct ImprovedCriteria {
    pub min_sf: f64,
    pub max_sf: f64,
    pub min_beds: f64,
    pub max_beds: f64,
    pub min_acres: f64,
    pub max_acres: f64,
    pub months_back: u32,
    pub zones: ZoneSet,
}

impl Default for ImprovedCriteria {
    fn default() -> Self {
        Self {
            min_sf: 1200.0,
            max_sf: 1800.0,
            min_beds: 3.0,
            max_beds: 4.0,
            min_acres: 0.75,
            max_acres: 3.0,
            months_back: 24,
            zones: ZoneSet::market(),
        }
    }
}

/// Comparable vacant land sales.
#[derive(Debug, Clone, PartialEq)]
pub struct LandCriteria {
    pub min_acres: f64,
    pub max_acres: f64,
    pub months_back: u32,
    pub zones: ZoneSet,
}

impl Default for LandCriteria {
    fn default() -> Self {
        Self {
            min_acres: 1.5,
            max_acres: 6.5,
            months_back: 36,
            zones: ZoneSet::market(),
        }
    }
}

/// Rows that are single-family, in every size range, sold inside the
/// lookback window and located in one of `c.zones`.
#[instrument(level = "debug", skip_all, fields(rows = batch.num_rows()))]
pub fn filter_improved(
    batch: &RecordBatch,
    c: &ImprovedCriteria,
    clock: &dyn Clock,
) -> Result<RecordBatch> {
    let cutoff = lookback_cutoff(clock.today(), c.months_back);
    let masks = vec![
        matches(column::<StringArray>(batch, col::PROPERTY_TYPE)?, &SINGLE_FAMILY),
        in_range(column::<Float64Array>(batch, col::LIVING_AREA)?, c.min_sf, c.max_sf),
        in_range(column::<Float64Array>(batch, col::BEDROOMS)?, c.min_beds, c.max_beds),
        in_range(column::<Float64Array>(batch, col::LOT_ACRES)?, c.min_acres, c.max_acres),
        sold_since(column::<Date32Array>(batch, col::SOLD_DATE)?, cutoff),
        in_zones(column::<StringArray>(batch, col::ZONE)?, &c.zones),
    ];
    let mask = all_of(masks, batch.num_rows())?;
    let out = filter_record_batch(batch, &mask)?;
    debug!(%cutoff, kept = out.num_rows(), "improved filter");
    Ok(out)
}

/// Rows typed as land or lot, within the acreage range, sold inside the
/// lookback window and located in one of `c.zones`.
#[instrument(level = "debug", skip_all, fields(rows = batch.num_rows()))]
pub fn filter_land(batch: &RecordBatch, c: &LandCriteria, clock: &dyn Clock) -> Result<RecordBatch> {
    let cutoff = lookback_cutoff(clock.today(), c.months_back);
    let masks = vec![
        matches(column::<StringArray>(batch, col::PROPERTY_TYPE)?, &LAND_OR_LOT),
        in_range(column::<Float64Array>(batch, col::LOT_ACRES)?, c.min_acres, c.max_acres),
        sold_since(column::<Date32Array>(batch, col::SOLD_DATE)?, cutoff),
        in_zones(column::<StringArray>(batch, col::ZONE)?, &c.zones),
    ];
    let mask = all_of(masks, batch.num_rows())?;
    let out = filter_record_batch(batch, &mask)?;
    debug!(%cutoff, kept = out.num_rows(), "land filter");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::LoadConfig;
    use crate::load::SalesTable;
    use chrono::NaiveDate;

    const HEADER: &str = "Sold date (MM/DD/YYYY),Living area,Bedrooms,Bathrooms,Lot/land area,Property price (USD),Property type,Zip\n";

    fn today() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    fn table(rows: &str) -> SalesTable {
        let text = format!("{HEADER}{rows}");
        SalesTable::from_reader(text.as_bytes(), &LoadConfig::default()).unwrap()
    }

    #[test]
    fn improved_keeps_matching_single_family() -> Result<()> {
        let t = table("09/01/2026,1500,3,2,1.0,300000,Single Family Residence,30513\n");
        let out = t.improved_at(&ImprovedCriteria::default(), &today())?;
        assert_eq!(out.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn improved_bounds_are_inclusive() -> Result<()> {
        let t = table(
            "09/01/2026,1200,3,2,0.75,300000,single-family,30513\n\
             09/01/2026,1800,4,2,3.0,300000,Single Family,30560\n\
             09/01/2026,1801,4,2,3.0,300000,Single Family,30560\n\
             09/01/2026,1500,5,2,1.0,300000,Single Family,30560\n\
             09/01/2026,1500,3,2,0.5,300000,Single Family,30560\n",
        );
        let out = t.improved_at(&ImprovedCriteria::default(), &today())?;
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn lookback_cutoff_day_is_included() -> Result<()> {
        // today 2026-10-18, 24 months back ⇒ 2024-10-18
        let t = table(
            "10/18/2024,1500,3,2,1.0,300000,Single Family,30513\n\
             10/17/2024,1500,3,2,1.0,300000,Single Family,30513\n",
        );
        let out = t.improved_at(&ImprovedCriteria::default(), &today())?;
        assert_eq!(out.num_rows(), 1);
        let dates = column::<Date32Array>(&out, col::SOLD_DATE)?;
        assert_eq!(
            dates.value_as_date(0),
            NaiveDate::from_ymd_opt(2024, 10, 18)
        );
        Ok(())
    }

    #[test]
    fn missing_fields_exclude_rows() -> Result<()> {
        let t = table(
            ",1500,3,2,1.0,300000,Single Family,30513\n\
             09/01/2026,,3,2,1.0,300000,Single Family,30513\n\
             09/01/2026,1500,,2,1.0,300000,Single Family,30513\n\
             09/01/2026,1500,3,2,,300000,Single Family,30513\n\
             09/01/2026,1500,3,2,1.0,300000,,30513\n\
             09/01/2026,1500,3,2,1.0,300000,Single Family,\n",
        );
        let out = t.improved_at(&ImprovedCriteria::default(), &today())?;
        assert_eq!(out.num_rows(), 0);
        Ok(())
    }

    #[test]
    fn land_keeps_land_and_drops_houses_in_same_zone() -> Result<()> {
        let t = table(
            "09/01/2025,,,,2.0,100000,Land,30560\n\
             09/01/2025,1500,3,2,2.0,300000,Single Family,30560\n\
             09/01/2025,,,,2.0,80000,Residential Lot,30540\n",
        );
        let out = t.land_at(&LandCriteria::default(), &today())?;
        assert_eq!(out.num_rows(), 2);
        let types = column::<StringArray>(&out, col::PROPERTY_TYPE)?;
        assert_eq!(types.value(0), "Land");
        assert_eq!(types.value(1), "Residential Lot");
        Ok(())
    }

    #[test]
    fn land_bounds_are_inclusive() -> Result<()> {
        let t = table(
            "09/01/2025,,,,1.5,100000,Land,30560\n\
             09/01/2025,,,,6.5,100000,Land,30560\n\
             09/01/2025,,,,1.49,100000,Land,30560\n\
             09/01/2025,,,,6.51,100000,Land,30560\n",
        );
        let out = t.land_at(&LandCriteria::default(), &today())?;
        let acres = column::<Float64Array>(&out, col::LOT_ACRES)?;
        assert_eq!(acres.values().to_vec(), vec![1.5, 6.5]);
        Ok(())
    }

    #[test]
    fn land_lookback_is_36_months() -> Result<()> {
        // today 2026-10-18, 36 months back ⇒ 2023-10-18
        let t = table(
            "10/18/2023,,,,2.0,100000,Land,30560\n\
             10/17/2023,,,,2.0,100000,Land,30560\n\
             04/18/2024,,,,2.0,100000,Land,30560\n",
        );
        let out = t.land_at(&LandCriteria::default(), &today())?;
        let dates = column::<Date32Array>(&out, col::SOLD_DATE)?;
        assert_eq!(out.num_rows(), 2);
        assert_eq!(dates.value_as_date(0), NaiveDate::from_ymd_opt(2023, 10, 18));
        assert_eq!(dates.value_as_date(1), NaiveDate::from_ymd_opt(2024, 4, 18));

        // the same 30-month-old sale is outside the improved window
        let house = table("04/18/2024,1500,3,2,1.0,300000,Single Family,30560\n");
        assert_eq!(house.improved_at(&ImprovedCriteria::default(), &today())?.num_rows(), 0);
        Ok(())
    }

    #[test]
    fn two_digit_year_sales_stay_in_window() -> Result<()> {
        let t = table("09/01/26,1500,3,2,1.0,300000,Single Family,30513\n");
        assert_eq!(t.coercions().sold_date, 0);
        assert_eq!(t.improved_at(&ImprovedCriteria::default(), &today())?.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn explicit_zone_set_overrides_default() -> Result<()> {
        let t = table("09/01/2025,,,,2.0,100000,Land,30560\n");
        let only_primary = LandCriteria {
            zones: ZoneSet::new(["30513"]),
            ..LandCriteria::default()
        };
        assert_eq!(t.land_at(&only_primary, &today())?.num_rows(), 0);
        assert_eq!(t.land_at(&LandCriteria::default(), &today())?.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_untouched() -> Result<()> {
        let t = table(
            "09/01/2026,1500,3,2,1.0,300000,Single Family,30513\n\
             09/01/2026,2500,3,2,1.0,500000,Single Family,30513\n\
             09/01/2025,,,,2.0,100000,Land,30560\n",
        );
        let before = t.batch().clone();
        let c = ImprovedCriteria::default();
        let once = filter_improved(t.batch(), &c, &today())?;
        let twice = filter_improved(&once, &c, &today())?;
        assert_eq!(once, twice);
        assert_eq!(once.num_rows(), 1);

        let land_once = t.land_at(&LandCriteria::default(), &today())?;
        let land_twice = filter_land(&land_once, &LandCriteria::default(), &today())?;
        assert_eq!(land_once, land_twice);

        assert_eq!(t.batch(), &before);
        Ok(())
    }

    #[test]
    fn foreign_batch_is_an_error() {
        let batch = RecordBatch::new_empty(std::sync::Arc::new(arrow::datatypes::Schema::empty()));
        assert!(filter_land(&batch, &LandCriteria::default(), &today()).is_err());
    }
}
