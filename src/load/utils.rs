// src/load/utils.rs

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a numeric cell after dropping every char in `strip` (currency, grouping).
/// Empty, unparseable and non-finite text all come back as `None`.
pub fn parse_number(raw: &str, strip: &str) -> Option<f64> {
    let cleaned: String = clean_str(raw)
        .chars()
        .filter(|c| !strip.contains(*c))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Canonical text for a postal zone:
///  - `"30513.0"`     → `"30513"` (float-typed exports)
///  - `"30513-1234"`  → `"30513"` (ZIP+4)
/// Returns `None` for blank cells.
pub fn normalize_zone(raw: &str) -> Option<String> {
    let s = clean_str(raw);
    let s = match s.split_once('-') {
        Some((head, tail)) if !head.is_empty() && tail.chars().all(|c| c.is_ascii_digit()) => {
            head.trim().to_string()
        }
        _ => s,
    };
    let s = match s.split_once('.') {
        Some((int, frac))
            if !int.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && frac.chars().all(|c| c == '0') =>
        {
            int.to_string()
        }
        _ => s,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
