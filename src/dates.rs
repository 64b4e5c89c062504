use chrono::{Datelike, Local, NaiveDate};

use crate::error::{FoyerError, Result};

/// Parse an ISO date stored in the database.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FoyerError::InvalidDate(s.to_string()))
}

/// Accept either YYYY-MM or YYYY-MM-DD and normalize to the first of the month.
pub fn parse_month(s: &str) -> Result<String> {
    let full = if s.len() == 7 { format!("{s}-01") } else { s.to_string() };
    let d = parse_date(&full)?;
    Ok(month_key(d.year(), d.month()))
}

pub fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}-01")
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// First of the current month, the cutoff for provision closing.
pub fn current_month() -> String {
    let now = Local::now();
    month_key(now.year(), now.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_short_and_long() {
        assert_eq!(parse_month("2025-03").unwrap(), "2025-03-01");
        assert_eq!(parse_month("2025-03-17").unwrap(), "2025-03-01");
        assert!(parse_month("march").is_err());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("2025-13-40").is_err());
        assert!(parse_date("2025-02-28").is_ok());
    }
}
