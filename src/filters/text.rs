//! Text sanitizing filters
//!
//! These filters only ever transform their input; `name` is the one that
//! can reject it.

use super::regex;
use crate::core::value::to_text;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn non_alpha() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"[^a-zA-Z]")
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // a tag opens with a letter, `/`, `!` or `?`; an unterminated tag
    // swallows the rest of the input
    regex(&RE, r"(?s)<[A-Za-z/!?][^>]*(?:>|$)")
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"\s+")
}

/// Filter: keep only ASCII letters, after trimming
pub fn az(value: Value) -> Result<Value, String> {
    Ok(Value::String(az_text(&value)))
}

/// Filter: `az`, then uppercase
pub fn az_upper(value: Value) -> Result<Value, String> {
    Ok(Value::String(az_text(&value).to_uppercase()))
}

/// Filter: `az`, then lowercase
pub fn az_lower(value: Value) -> Result<Value, String> {
    Ok(Value::String(az_text(&value).to_lowercase()))
}

fn az_text(value: &Value) -> String {
    non_alpha()
        .replace_all(to_text(value).trim(), "")
        .into_owned()
}

/// Filter: keep the characters usually found in a business entity name
///
/// E.g. `Plumbing-Contractors & Associates, Ltd.`; digits are dropped.
pub fn business_name(value: Value) -> Result<Value, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"[^A-Za-z,.\-&# ]+");
    Ok(Value::String(
        re.replace_all(to_text(&value).trim(), "").into_owned(),
    ))
}

/// Filter: trim, strip tags and backslash escapes
pub fn min(value: Value) -> Result<Value, String> {
    let text = to_text(&value);
    let stripped = strip_tags(text.trim());
    Ok(Value::String(strip_slashes(&stripped)))
}

/// Filter: strip tags, turn escaped line breaks into `<br/>`
///
/// Only the literal two-character sequences `\r\n` and `\n` are replaced,
/// which is how line breaks arrive once a textarea value has been escaped.
pub fn paragraph(value: Value) -> Result<Value, String> {
    let stripped = strip_tags(&to_text(&value));
    Ok(Value::String(
        stripped.replace("\\r\\n", "<br/>").replace("\\n", "<br/>"),
    ))
}

/// Filter: trim and collapse whitespace runs, including line feeds
pub fn rmnl(value: Value) -> Result<Value, String> {
    let text = to_text(&value);
    Ok(Value::String(
        whitespace_run().replace_all(text.trim(), " ").into_owned(),
    ))
}

/// Filter: alphabetic personal name between 2 and 30 characters
pub fn name(value: Value) -> Result<Value, String> {
    check_name(&value, 2, 30)
}

/// Build a `name` filter with custom length bounds
///
/// The built-in `name` filter is fixed to 2..=30 characters; register the
/// result of this function as a custom filter to use other bounds.
pub fn name_between(
    min: usize,
    max: usize,
) -> impl Fn(Value) -> Result<Value, String> + Send + Sync + Clone + 'static {
    move |value: Value| check_name(&value, min, max)
}

fn check_name(value: &Value, min: usize, max: usize) -> Result<Value, String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = regex(&RE, r"[^ A-Za-z0-9_]+");
    let text = to_text(value);
    let cleaned = re.replace_all(text.trim(), "");

    let len = cleaned.chars().count();
    let alphabetic = cleaned.chars().all(|c| c.is_ascii_alphabetic() || c == ' ');
    if !alphabetic || len < min || len > max {
        return Err(format!(
            "Please enter an alphabetic name between {} and {} characters. Spaces are allowed.",
            min, max
        ));
    }
    Ok(Value::String(cleaned.into_owned()))
}

/// Remove HTML-like tags
pub fn strip_tags(input: &str) -> String {
    html_tag().replace_all(input, "").into_owned()
}

/// Remove backslash escapes: `\'` becomes `'`, `\\` becomes `\`
pub fn strip_slashes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}
