use chrono::{DateTime, FixedOffset};

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.to_utc().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Empty or whitespace-only form text becomes `None`.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn test_datetime_to_string_is_utc() {
        let dt = DateTime::parse_from_rfc3339("2025-04-01T10:00:00+07:00").unwrap();
        assert_eq!(datetime_to_string(dt), "2025-04-01 03:00:00");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank("3.8"), Some("3.8".to_string()));
    }
}
