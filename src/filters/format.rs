//! Format filters: numbers, email addresses and dates

use crate::core::value::to_text;
use serde_json::{Value, json};
use validator::ValidateEmail;

/// Filter: cast to an integer
///
/// Strings are read like a C `atoi`: leading whitespace, an optional sign,
/// then as many digits as follow. Anything that does not start with a
/// number yields `0`. JSON numbers are truncated toward zero and `true`
/// becomes `1`.
pub fn cast_int(value: Value) -> Result<Value, String> {
    let n = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::Bool(b) => i64::from(*b),
        Value::String(s) => leading_int(s),
        _ => 0,
    };
    Ok(json!(n))
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        n = if negative {
            n.saturating_mul(10).saturating_sub(d)
        } else {
            n.saturating_mul(10).saturating_add(d)
        };
    }
    n
}

/// Filter: trimmed, syntactically valid email address
pub fn email(value: Value) -> Result<Value, String> {
    let address = to_text(&value).trim().to_string();
    if !address.validate_email() {
        return Err("invalid email address".to_string());
    }
    Ok(Value::String(address))
}

/// Filter: normalize a three-part date to `-` separators
///
/// The separator is the first of `-`, `/` or `,` present in the input. The
/// parts themselves are not interpreted, so both `2023/01/15` and
/// `01/15/2023` are accepted.
pub fn normalize_date(value: Value) -> Result<Value, String> {
    let text = to_text(&value);

    let Some(separator) = ['-', '/', ','].into_iter().find(|c| text.contains(*c)) else {
        return Err("Invalid separator used. Use - OR / OR , to separate the date.".to_string());
    };

    if text.matches(separator).count() != 2 {
        return Err("Malformed date given in form.".to_string());
    }

    let parts: Vec<&str> = text.split(separator).collect();
    if parts.len() != 3 {
        return Err("Invalid date".to_string());
    }

    Ok(Value::String(parts.join("-")))
}
