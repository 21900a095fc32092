//! Voucher number extraction.

use super::patterns::VOUCHER_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// Finds `{prefix}_{suffix}` voucher numbers.
pub struct VoucherExtractor;

impl VoucherExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VoucherExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VoucherExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        VOUCHER_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let value = format!("{}_{}", &caps[1], &caps[2]);
                Some(
                    ExtractionMatch::new(value, 0.9, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// First voucher number in reading order.
pub fn extract_voucher_number(text: &str) -> Option<String> {
    VoucherExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_separated() {
        assert_eq!(extract_voucher_number("12 345678").as_deref(), Some("12_345678"));
    }

    #[test]
    fn test_no_digit_grouping() {
        assert_eq!(extract_voucher_number("AB1234567CD"), None);
        assert_eq!(extract_voucher_number(""), None);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Voucher No: 07/000123\nRef 99 999999";
        let all = VoucherExtractor::new().extract_all(text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].value, "07_000123");
        assert_eq!(all[0].source, "07/000123");
        assert_eq!(extract_voucher_number(text).as_deref(), Some("07_000123"));
    }
}
