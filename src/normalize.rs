//! Canonicalizers for comparison fields.
//!
//! Expected values come from hand-edited spreadsheets and agent states come
//! from multiple backend schema revisions, so both sides are normalized
//! before any equality check. All functions here are pure.

use chrono::NaiveDate;

/// Normalize a hierarchical administrative identifier (GADM convention).
///
/// Strips any suffix after the first underscore (a version disambiguator),
/// replaces hyphens with dots (both encode hierarchy levels), and lowercases.
/// `"USA.5_1"` and `"usa-5"` normalize identically.
pub fn normalize_gadm_id(id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    id.split('_')
        .next()
        .unwrap_or("")
        .replace('-', ".")
        .to_lowercase()
}

/// Normalize a free-text or categorical comparison value.
///
/// `None`-like inputs (the literal string `"None"`, whitespace-only, empty)
/// become the empty string, which downstream code treats as "no value".
pub fn normalize_value(value: &str) -> String {
    if value == "None" || value.trim().is_empty() {
        return String::new();
    }
    value.trim().to_string()
}

/// Normalize a date string to `YYYY-MM-DD` for comparison.
///
/// Accepted input formats, tried in order:
/// - `M/D/YYYY` or `MM/DD/YYYY` (e.g. `1/1/2023`, `12/31/2023`)
/// - `YYYY-MM-DD` (already normalized)
/// - `YYYY` (year only, becomes `YYYY-01-01`)
///
/// `None`-like or unparsable input yields the empty string, which is treated
/// identically to "no date supplied".
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "None" {
        return String::new();
    }

    for format in ["%m/%d/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    // Bare 4-digit year: January 1 of that year.
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        return format!("{trimmed}-01-01");
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::suffix_and_case("USA.5_1", "usa.5")]
    #[case::hyphen_hierarchy("usa-5", "usa.5")]
    #[case::plain_country("BRA", "bra")]
    #[case::empty("", "")]
    #[case::suffix_only("IDN.14.13_2", "idn.14.13")]
    fn test_normalize_gadm_id(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_gadm_id(input), expected);
    }

    #[test]
    fn test_gadm_hierarchy_encodings_agree() {
        assert_eq!(normalize_gadm_id("USA.5_1"), normalize_gadm_id("usa-5"));
    }

    #[rstest]
    #[case::plain("country", "country")]
    #[case::surrounding_whitespace("  state-province  ", "state-province")]
    #[case::none_literal("None", "")]
    #[case::whitespace_only("   ", "")]
    #[case::empty("", "")]
    fn test_normalize_value(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_value(input), expected);
    }

    #[rstest]
    #[case::us_short("1/1/2023", "2023-01-01")]
    #[case::us_padded("12/31/2023", "2023-12-31")]
    #[case::iso_pass_through("2023-08-15", "2023-08-15")]
    #[case::year_only("2024", "2024-01-01")]
    #[case::none_literal("None", "")]
    #[case::empty("", "")]
    #[case::whitespace("   ", "")]
    #[case::garbage("not-a-date", "")]
    #[case::five_digits("12345", "")]
    fn test_normalize_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_date(input), expected);
    }

    #[test]
    fn test_same_date_across_formats() {
        assert_eq!(normalize_date("1/1/2023"), normalize_date("2023-01-01"));
        assert_eq!(normalize_date("1/1/2023"), "2023-01-01");
    }
}
