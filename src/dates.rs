//! `YYYY-MM-DD` handling shared by meal plans and shopping lists.

use time::{macros::format_description, Date};

use crate::error::AppError;

/// Parse a calendar date, naming the offending field on failure.
pub fn parse_date(field: &str, value: &str) -> Result<Date, AppError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::validation(format!("{field} must be a date in YYYY-MM-DD format")))
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("date", "2025-02-01").unwrap(), date!(2025 - 02 - 01));
        assert_eq!(parse_date("date", " 2025-12-31 ").unwrap(), date!(2025 - 12 - 31));
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = parse_date("start_date", "not-a-date").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.starts_with("start_date")));
        assert!(parse_date("d", "2025-02-30").is_err());
        assert!(parse_date("d", "2025/02/01").is_err());
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_date(date!(2025 - 01 - 05)), "2025-01-05");
    }
}
