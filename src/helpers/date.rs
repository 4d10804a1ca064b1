//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM DD, YYYY") // -> "January 15, 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(&moment_to_chrono_format(format)).to_string()
}

/// Convert a Moment.js format to a chrono format.
///
/// Anything that is not a token is copied literally, so a stray `%` in the
/// config cannot turn into a broken strftime item.
fn moment_to_chrono_format(format: &str) -> String {
    // Longer tokens first so `MMMM` is not eaten by `MM`
    const TOKENS: [(&str, &str); 14] = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
    ];

    let mut result = String::with_capacity(format.len());
    let mut rest = format;

    'scan: while let Some(c) = rest.chars().next() {
        for (token, spec) in TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                result.push_str(spec);
                rest = after;
                continue 'scan;
            }
        }

        if c == '%' {
            result.push_str("%%");
        } else {
            result.push(c);
        }
        rest = &rest[c.len_utf8()..];
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_format_date() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-05");
        assert_eq!(format_date(&date, "MMMM DD, YYYY"), "January 05, 2024");
        assert_eq!(format_date(&date, "HH:mm"), "10:30");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("MMMM DD, YYYY"), "%B %d, %Y");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("MMmm"), "%m%M");
    }

    #[test]
    fn test_percent_in_format_is_literal() {
        let date = Local.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(moment_to_chrono_format("100%"), "100%%");
        assert_eq!(format_date(&date, "DD MMMM 100%"), "05 January 100%");
        assert_eq!(format_date(&date, "%Y YYYY"), "%Y 2024");
    }
}
