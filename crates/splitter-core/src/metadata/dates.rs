//! Labeled date extraction and canonicalization.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::LABELED_DATE;
use super::{ExtractionMatch, FieldExtractor};

/// Finds dates introduced by a "Date" label.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        LABELED_DATE
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(1)?;
                let (value, confidence) = match parse_date(token.as_str()) {
                    Some(date) => (date.format("%Y-%m-%d").to_string(), 0.95),
                    None => {
                        debug!("Unparseable date {:?}, keeping it as-is", token.as_str());
                        (lenient_date(token.as_str()), 0.5)
                    }
                };
                Some(
                    ExtractionMatch::new(value, confidence, token.as_str())
                        .with_position(token.start(), token.end()),
                )
            })
            .collect()
    }
}

/// Parse a matched date token, picking the format from its shape.
///
/// `/` means `DD/MM/YYYY`, a 4-digit first `-` group means `YYYY-MM-DD`, and
/// anything else is `DD Month YYYY` with hyphens read as spaces.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    if token.contains('/') {
        NaiveDate::parse_from_str(token, "%d/%m/%Y").ok()
    } else if token.contains('-') && token.split('-').next().is_some_and(|p| p.len() == 4) {
        NaiveDate::parse_from_str(token, "%Y-%m-%d").ok()
    } else {
        let spaced = token.replace('-', " ");
        // chrono's %B also takes "Mar"; only full month names are dates here
        let month = spaced.split_whitespace().nth(1)?;
        if !MONTHS.iter().any(|m| m.eq_ignore_ascii_case(month)) {
            return None;
        }
        NaiveDate::parse_from_str(&spaced, "%d %B %Y").ok()
    }
}

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Canonical `YYYY-MM-DD` form of a date token, or the token with `/` and
/// spaces turned into `-` when it does not parse.
pub fn normalize_date(token: &str) -> String {
    match parse_date(token) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => lenient_date(token),
    }
}

fn lenient_date(token: &str) -> String {
    token.replace(['/', ' '], "-")
}

/// First labeled date in reading order, canonicalized.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_day_month_year_slashes() {
        assert_eq!(extract_date("Date: 05/03/2024").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(extract_date("DATE 2024-03-05").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(extract_date("Date: 5 March 2024").as_deref(), Some("2024-03-05"));
        assert_eq!(extract_date("date 15-January-2023").as_deref(), Some("2023-01-15"));
    }

    #[test]
    fn test_unparseable_falls_back() {
        // Matches the pattern but is not a real date.
        assert_eq!(extract_date("Date: 31/02/2024").as_deref(), Some("31-02-2024"));
        assert_eq!(extract_date("Date: 5 Smarch 2024").as_deref(), Some("5-Smarch-2024"));

        let matched = DateExtractor::new().extract("Date: 31/02/2024").unwrap();
        assert!(matched.confidence < 0.9);
    }

    #[test]
    fn test_abbreviated_month_falls_back() {
        assert_eq!(parse_date("5 Mar 2024"), None);
        assert_eq!(extract_date("Date: 5 Mar 2024").as_deref(), Some("5-Mar-2024"));
        assert_eq!(extract_date("DATE: 5 MARCH 2024").as_deref(), Some("2024-03-05"));
    }

    #[test]
    fn test_unlabeled_date_ignored() {
        assert_eq!(extract_date("Issued 05/03/2024"), None);
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("2024-3-5"), "2024-03-05");
        assert_eq!(normalize_date("05/13/2024"), "05-13-2024");
    }
}
