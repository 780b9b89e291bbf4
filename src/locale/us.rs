//! United States locale pack

use super::LocalePack;
use crate::core::callable::FilterFn;
use crate::core::value::to_text;
use crate::filters::regex;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Two-letter code and upper-case full name of the 50 states plus DC
pub const US_STATES: [(&str, &str); 51] = [
    ("AL", "ALABAMA"),
    ("AK", "ALASKA"),
    ("AZ", "ARIZONA"),
    ("AR", "ARKANSAS"),
    ("CA", "CALIFORNIA"),
    ("CO", "COLORADO"),
    ("CT", "CONNECTICUT"),
    ("DE", "DELAWARE"),
    ("DC", "DISTRICT OF COLUMBIA"),
    ("FL", "FLORIDA"),
    ("GA", "GEORGIA"),
    ("HI", "HAWAII"),
    ("ID", "IDAHO"),
    ("IL", "ILLINOIS"),
    ("IN", "INDIANA"),
    ("IA", "IOWA"),
    ("KS", "KANSAS"),
    ("KY", "KENTUCKY"),
    ("LA", "LOUISIANA"),
    ("ME", "MAINE"),
    ("MD", "MARYLAND"),
    ("MA", "MASSACHUSETTS"),
    ("MI", "MICHIGAN"),
    ("MN", "MINNESOTA"),
    ("MS", "MISSISSIPPI"),
    ("MO", "MISSOURI"),
    ("MT", "MONTANA"),
    ("NE", "NEBRASKA"),
    ("NV", "NEVADA"),
    ("NH", "NEW HAMPSHIRE"),
    ("NJ", "NEW JERSEY"),
    ("NM", "NEW MEXICO"),
    ("NY", "NEW YORK"),
    ("NC", "NORTH CAROLINA"),
    ("ND", "NORTH DAKOTA"),
    ("OH", "OHIO"),
    ("OK", "OKLAHOMA"),
    ("OR", "OREGON"),
    ("PA", "PENNSYLVANIA"),
    ("RI", "RHODE ISLAND"),
    ("SC", "SOUTH CAROLINA"),
    ("SD", "SOUTH DAKOTA"),
    ("TN", "TENNESSEE"),
    ("TX", "TEXAS"),
    ("UT", "UTAH"),
    ("VT", "VERMONT"),
    ("VA", "VIRGINIA"),
    ("WA", "WASHINGTON"),
    ("WV", "WEST VIRGINIA"),
    ("WI", "WISCONSIN"),
    ("WY", "WYOMING"),
];

const FILTERS: [&str; 4] = ["us_phone", "us_state_abbr", "us_state_full", "us_zipcode"];

/// US phone numbers, ZIP codes and states
#[derive(Debug, Clone, Copy, Default)]
pub struct UsLocale;

impl LocalePack for UsLocale {
    fn code(&self) -> &str {
        "US"
    }

    fn filter_names(&self) -> Vec<&'static str> {
        FILTERS.to_vec()
    }

    fn filter(&self, name: &str) -> Option<FilterFn> {
        let f: FilterFn = match name {
            "us_phone" => Arc::new(us_phone),
            "us_state_abbr" => Arc::new(us_state_abbr),
            "us_state_full" => Arc::new(us_state_full),
            "us_zipcode" => Arc::new(us_zipcode),
            _ => return None,
        };
        Some(f)
    }
}

/// Filter: ten-digit phone number, punctuation removed
pub fn us_phone(value: Value) -> Result<Value, String> {
    let digits: String = to_text(&value)
        .trim()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.len() != 10 {
        return Err(format!(
            "A phone number must have 10 digits, got {}",
            digits.len()
        ));
    }
    Ok(Value::String(digits))
}

/// Filter: 5-digit ZIP code with optional `-1234` extension, unchanged
pub fn us_zipcode(value: Value) -> Result<Value, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"^[0-9]{5}(-[0-9]{4})?$");

    let text = to_text(&value);
    if !re.is_match(&text) {
        return Err("Invalid Zip Code Entered.".to_string());
    }
    Ok(Value::String(text))
}

/// Filter: two-letter state code, upper-cased
pub fn us_state_abbr(value: Value) -> Result<Value, String> {
    let state = to_text(&value).to_uppercase();
    if !US_STATES.iter().any(|(abbr, _)| *abbr == state) {
        return Err("That isn't a real state.".to_string());
    }
    Ok(Value::String(state))
}

/// Filter: full state name, upper-cased
pub fn us_state_full(value: Value) -> Result<Value, String> {
    let state = to_text(&value).to_uppercase();
    if !US_STATES.iter().any(|(_, full)| *full == state) {
        return Err("That isn't a real state.".to_string());
    }
    Ok(Value::String(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pack_exposes_all_filters() {
        let pack = UsLocale;
        for name in pack.filter_names() {
            assert!(pack.provides(name), "{} should resolve", name);
        }
        assert!(!pack.provides("ca_phone"));
    }

    // === us_phone() ===

    #[test]
    fn test_us_phone_strips_punctuation() {
        assert_eq!(us_phone(json!(" (555) 123-4567 ")).unwrap(), json!("5551234567"));
    }

    #[test]
    fn test_us_phone_ten_digits_unchanged() {
        for input in ["0000000000", "5551234567", "9999999999"] {
            assert_eq!(us_phone(json!(input)).unwrap(), json!(input));
        }
    }

    #[test]
    fn test_us_phone_wrong_digit_count() {
        assert!(us_phone(json!("555-1234")).is_err());
        assert!(us_phone(json!("1 (555) 123-4567")).is_err());
        assert!(us_phone(json!("")).is_err());
    }

    #[test]
    fn test_us_phone_numeric_input() {
        assert_eq!(us_phone(json!(5551234567u64)).unwrap(), json!("5551234567"));
    }

    // === us_zipcode() ===

    #[test]
    fn test_us_zipcode_valid() {
        assert_eq!(us_zipcode(json!("90210")).unwrap(), json!("90210"));
        assert_eq!(us_zipcode(json!("90210-1234")).unwrap(), json!("90210-1234"));
    }

    #[test]
    fn test_us_zipcode_invalid() {
        for input in ["9021", "902101", "902101234", "90210-123", "abcde", " 90210", "90210-"] {
            assert!(us_zipcode(json!(input)).is_err(), "{} should fail", input);
        }
    }

    // === states ===

    #[test]
    fn test_state_table_size() {
        assert_eq!(US_STATES.len(), 51);
    }

    #[test]
    fn test_us_state_abbr() {
        assert_eq!(us_state_abbr(json!("ca")).unwrap(), json!("CA"));
        assert_eq!(us_state_abbr(json!("DC")).unwrap(), json!("DC"));
        assert!(us_state_abbr(json!("ZZ")).is_err());
    }

    #[test]
    fn test_us_state_full() {
        assert_eq!(
            us_state_full(json!("New York")).unwrap(),
            json!("NEW YORK")
        );
        assert!(us_state_full(json!("Ontario")).is_err());
    }
}
