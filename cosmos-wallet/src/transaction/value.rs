//! Numeric normalization and canonical JSON
//!
//! The wire format expects every integer as a decimal string, and the bytes
//! that get signed must not depend on how a map happened to be built. Both
//! transforms here take a [`Value`] by reference and return new data; the
//! caller's value is never modified.

use serde_json::{Map, Number, Value};

use crate::error::Result;

/// Numbers whose expansion would exceed this many digits keep their JSON text
const MAX_EXPANDED_DIGITS: usize = 1024;

/// Replace every number in `value`, at any depth, by its decimal string
pub fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(number) => Value::String(number_to_decimal(number)),
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), normalize_numbers(item)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Exact decimal form of a JSON number
///
/// Numbers keep the digits they were written with, beyond the range of any
/// machine type. Exponents are expanded and trailing fractional zeros are
/// dropped, so `42`, `42.0` and `4.2e1` all become `"42"`.
pub fn number_to_decimal(number: &Number) -> String {
    if let Some(n) = number.as_u64() {
        return n.to_string();
    }
    if let Some(n) = number.as_i64() {
        return n.to_string();
    }

    let text = number.to_string();
    expand_decimal(&text).unwrap_or(text)
}

/// Rewrite JSON number text as a plain decimal without exponent
fn expand_decimal(text: &str) -> Option<String> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&unsigned[..i], unsigned[i + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int_part.is_empty() || !is_digits(int_part) || !is_digits(frac_part) {
        return None;
    }

    let digits = format!("{}{}", int_part, frac_part);
    // position of the decimal point within `digits`
    let point = (int_part.len() as i64).checked_add(exponent)?;
    if point.unsigned_abs() as usize > MAX_EXPANDED_DIGITS || digits.len() > MAX_EXPANDED_DIGITS {
        return None;
    }

    let (int_digits, frac_digits) = if point <= 0 {
        (String::new(), format!("{}{}", "0".repeat(point.unsigned_abs() as usize), digits))
    } else if point as usize >= digits.len() {
        (format!("{}{}", digits, "0".repeat(point as usize - digits.len())), String::new())
    } else {
        (digits[..point as usize].to_string(), digits[point as usize..].to_string())
    };

    let int_digits = match int_digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let frac_digits = frac_digits.trim_end_matches('0');

    if int_digits == "0" && frac_digits.is_empty() {
        return Some("0".to_string());
    }

    let sign = if negative { "-" } else { "" };
    Some(if frac_digits.is_empty() {
        format!("{}{}", sign, int_digits)
    } else {
        format!("{}{}.{}", sign, int_digits, frac_digits)
    })
}

/// Serialize `value` with sorted mapping keys and no whitespace
pub fn canonical_json(value: &Value) -> Result<String> {
    let mut out = String::new();
    write_canonical(value, &mut out)?;
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&serde_json::to_string(key)?);
                out.push(':');
                write_canonical(item, out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

/// Copy of `value` with `key` set to `field`, when `value` is a mapping
///
/// Non-mapping values are returned unchanged.
pub fn with_field(value: &Value, key: &str, field: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut map: Map<String, Value> = map.clone();
            map.insert(key.to_string(), field);
            Value::Object(map)
        }
        other => other.clone(),
    }
}
