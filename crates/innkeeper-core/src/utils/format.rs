use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Parse the date shapes the API and the date pickers produce:
/// RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]`, or a bare `YYYY-MM-DD`.
pub fn parse_date(date: &str) -> Option<NaiveDateTime> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => date.to_string(),
    }
}
