//! Canada locale pack

use super::LocalePack;
use crate::core::callable::FilterFn;
use crate::core::value::to_text;
use crate::filters::regex;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Two-letter code and upper-case full name of the provinces and territories
pub const CA_PROVINCES: [(&str, &str); 13] = [
    ("AB", "ALBERTA"),
    ("BC", "BRITISH COLUMBIA"),
    ("MB", "MANITOBA"),
    ("NB", "NEW BRUNSWICK"),
    ("NL", "NEWFOUNDLAND AND LABRADOR"),
    ("NS", "NOVA SCOTIA"),
    ("NT", "NORTHWEST TERRITORIES"),
    ("NU", "NUNAVUT"),
    ("ON", "ONTARIO"),
    ("PE", "PRINCE EDWARD ISLAND"),
    ("QC", "QUEBEC"),
    ("SK", "SASKATCHEWAN"),
    ("YT", "YUKON"),
];

const FILTERS: [&str; 4] = [
    "ca_phone",
    "ca_postal_code",
    "ca_province_abbr",
    "ca_province_full",
];

/// Canadian phone numbers, postal codes and provinces
#[derive(Debug, Clone, Copy, Default)]
pub struct CaLocale;

impl LocalePack for CaLocale {
    fn code(&self) -> &str {
        "CA"
    }

    fn filter_names(&self) -> Vec<&'static str> {
        FILTERS.to_vec()
    }

    fn filter(&self, name: &str) -> Option<FilterFn> {
        let f: FilterFn = match name {
            "ca_phone" => Arc::new(ca_phone),
            "ca_postal_code" => Arc::new(ca_postal_code),
            "ca_province_abbr" => Arc::new(ca_province_abbr),
            "ca_province_full" => Arc::new(ca_province_full),
            _ => return None,
        };
        Some(f)
    }
}

/// Filter: ten-digit phone number; a leading country code `1` is dropped
pub fn ca_phone(value: Value) -> Result<Value, String> {
    let digits: String = to_text(&value)
        .trim()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    let national = match digits.strip_prefix('1') {
        Some(rest) if digits.len() == 11 => rest,
        _ => digits.as_str(),
    };
    if national.len() != 10 {
        return Err(format!(
            "A phone number must have 10 digits, got {}",
            national.len()
        ));
    }
    Ok(Value::String(national.to_string()))
}

/// Filter: postal code in `A1A 1A1` form
pub fn ca_postal_code(value: Value) -> Result<Value, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"^([A-Z][0-9][A-Z]) ?([0-9][A-Z][0-9])$");

    let text = to_text(&value).trim().to_uppercase();
    let Some(caps) = re.captures(&text) else {
        return Err("Invalid Postal Code Entered.".to_string());
    };
    Ok(Value::String(format!("{} {}", &caps[1], &caps[2])))
}

/// Filter: two-letter province or territory code, upper-cased
pub fn ca_province_abbr(value: Value) -> Result<Value, String> {
    let province = to_text(&value).to_uppercase();
    if !CA_PROVINCES.iter().any(|(abbr, _)| *abbr == province) {
        return Err("That isn't a real province or territory.".to_string());
    }
    Ok(Value::String(province))
}

/// Filter: full province or territory name, upper-cased
pub fn ca_province_full(value: Value) -> Result<Value, String> {
    let province = to_text(&value).to_uppercase();
    if !CA_PROVINCES.iter().any(|(_, full)| *full == province) {
        return Err("That isn't a real province or territory.".to_string());
    }
    Ok(Value::String(province))
}
