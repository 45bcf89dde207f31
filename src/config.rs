// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use crate::load::utils::normalize_zone;

pub const DATA_PATH: &str = "data/sales.csv";

pub const PRIMARY_ZONES: &[&str] = &["30513"];
pub const SECONDARY_ZONES: &[&str] = &["30560", "30522", "30540", "30541"];

/// A set of normalized postal zone identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ZoneSet(BTreeSet<String>);

impl ZoneSet {
    pub fn new<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            zones
                .into_iter()
                .filter_map(|z| normalize_zone(z.as_ref()))
                .collect(),
        )
    }

    /// Primary ∪ secondary market zones.
    pub fn market() -> Self {
        Self::new(PRIMARY_ZONES.iter().chain(SECONDARY_ZONES))
    }

    pub fn contains(&self, zone: &str) -> bool {
        self.0.contains(zone)
    }

    pub fn union(&self, other: &ZoneSet) -> ZoneSet {
        ZoneSet(self.0.union(&other.0).cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// Zones show up in YAML either as bare numbers (30513) or quoted text.
#[derive(Deserialize)]
#[serde(untagged)]
enum ZoneId {
    Num(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for ZoneSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ids = Vec::<ZoneId>::deserialize(deserializer)?;
        Ok(ZoneSet::new(ids.into_iter().map(|id| match id {
            ZoneId::Num(n) => n.to_string(),
            ZoneId::Text(s) => s,
        })))
    }
}

/// Header names of the source columns the pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColumnNames {
    pub sold_date: String,
    pub living_area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub lot_acres: String,
    pub price: String,
    pub property_type: String,
    pub zone: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sold_date: "Sold date (MM/DD/YYYY)".into(),
            living_area: "Living area".into(),
            bedrooms: "Bedrooms".into(),
            bathrooms: "Bathrooms".into(),
            lot_acres: "Lot/land area".into(),
            price: "Property price (USD)".into(),
            property_type: "Property type".into(),
            zone: "Zip".into(),
        }
    }
}

impl ColumnNames {
    pub fn required(&self) -> [&str; 8] {
        [
            self.sold_date.as_str(),
            self.living_area.as_str(),
            self.bedrooms.as_str(),
            self.bathrooms.as_str(),
            self.lot_acres.as_str(),
            self.price.as_str(),
            self.property_type.as_str(),
            self.zone.as_str(),
        ]
    }
}

/// How raw text cells are turned into typed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadConfig {
    pub columns: ColumnNames,
    /// chrono format strings, tried in order.
    pub date_formats: Vec<String>,
    /// Characters removed from numeric cells before parsing (currency, grouping).
    pub numeric_strip: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            date_formats: vec!["%m/%d/%Y".into(), "%m/%d/%y".into(), "%Y-%m-%d".into()],
            numeric_strip: "$,".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarketConfig {
    pub data_path: PathBuf,
    pub primary_zones: ZoneSet,
    pub secondary_zones: ZoneSet,
    pub load: LoadConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_PATH),
            primary_zones: ZoneSet::new(PRIMARY_ZONES),
            secondary_zones: ZoneSet::new(SECONDARY_ZONES),
            load: LoadConfig::default(),
        }
    }
}

impl MarketConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("parsing market config YAML")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Default filter scope: every configured zone.
    pub fn market_zones(&self) -> ZoneSet {
        self.primary_zones.union(&self.secondary_zones)
    }
}
