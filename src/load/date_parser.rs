use chrono::{Datelike, NaiveDate};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse a sale date against each chrono format in turn.
/// A trailing time part (`"03/15/2024 00:00:00"`, `"2024-03-15T00:00:00"`)
/// is ignored.
pub fn parse_sale_date(s: &str, formats: &[String]) -> Option<NaiveDate> {
    let date_part = s
        .split(|c: char| c.is_whitespace() || c == 'T')
        .find(|p| !p.is_empty())?;
    formats.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(date_part, fmt)
            .ok()
            // %Y takes any digit count; "24" must fall through to %y
            .filter(|d| !fmt.contains("%Y") || d.year() >= 1000)
    })
}

/// NaiveDate → Arrow Date32 (days since 1970-01-01).
pub fn to_date32(d: NaiveDate) -> i32 {
    d.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}
