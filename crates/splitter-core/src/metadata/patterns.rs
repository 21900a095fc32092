//! Regex patterns for voucher metadata.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Voucher number: 2-digit prefix, any non-digits, 6-digit suffix
    pub static ref VOUCHER_PATTERN: Regex = Regex::new(
        r"\b(\d{2})\D*(\d{6})\b"
    ).unwrap();

    // "Date" label followed by DD/MM/YYYY, DD Month YYYY, DD-Month-YYYY or YYYY-MM-DD
    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)date[:\s]*(\d{1,2}/\d{1,2}/\d{4}|\d{1,2} \w+ \d{4}|\d{1,2}-\w+-\d{4}|\d{4}-\d{1,2}-\d{1,2})"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_needs_word_boundaries() {
        assert!(VOUCHER_PATTERN.is_match("No. 12 345678"));
        assert!(VOUCHER_PATTERN.is_match("12-345678"));
        assert!(!VOUCHER_PATTERN.is_match("AB1234567CD"));
        assert!(!VOUCHER_PATTERN.is_match("12 34567"));
    }

    #[test]
    fn test_date_label_is_case_insensitive() {
        for text in ["Date: 05/03/2024", "DATE 2024-03-05", "date:5 March 2024"] {
            assert!(LABELED_DATE.is_match(text), "{}", text);
        }
        assert!(!LABELED_DATE.is_match("05/03/2024"));
    }
}
