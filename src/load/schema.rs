// src/load/schema.rs

use arrow::datatypes::{DataType, Field, Schema};

/// Canonical column names of a normalized sales batch.
pub mod col {
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const LIVING_AREA: &str = "living_area";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const LOT_ACRES: &str = "lot_acres";
    pub const PRICE: &str = "price";
    pub const SOLD_DATE: &str = "sold_date";
    pub const ZONE: &str = "zone";
    pub const PRICE_PER_SQFT: &str = "price_per_sqft";
    pub const PRICE_PER_ACRE: &str = "price_per_acre";
}

/// Typed canonical fields first, then every other source header as nullable Utf8.
pub fn normalized_schema(passthrough: &[String]) -> Schema {
    let mut fields = vec![
        Field::new(col::PROPERTY_TYPE, DataType::Utf8, true),
        Field::new(col::LIVING_AREA, DataType::Float64, true),
        Field::new(col::BEDROOMS, DataType::Float64, true),
        Field::new(col::BATHROOMS, DataType::Float64, true),
        Field::new(col::LOT_ACRES, DataType::Float64, true),
        Field::new(col::PRICE, DataType::Float64, true),
        Field::new(col::SOLD_DATE, DataType::Date32, true),
        Field::new(col::ZONE, DataType::Utf8, true),
        Field::new(col::PRICE_PER_SQFT, DataType::Float64, true),
        Field::new(col::PRICE_PER_ACRE, DataType::Float64, true),
    ];
    fields.extend(
        passthrough
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true)),
    );
    Schema::new(fields)
}
