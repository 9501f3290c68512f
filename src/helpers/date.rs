//! Date helper functions

use chrono::NaiveDate;

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &NaiveDate, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// ISO 8601 calendar date
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// File name for an exported backup taken on `date`
pub fn backup_file_name(date: &NaiveDate) -> String {
    format!("blog-backup-{}.json", iso_date(date))
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date(), "MMMM DD, YYYY"), "January 15, 2024");
        assert_eq!(format_date(&date(), "MMM DD"), "Jan 15");
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(backup_file_name(&date()), "blog-backup-2024-01-15.json");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("dddd, MMMM DD"), "%A, %B %d");
    }
}
