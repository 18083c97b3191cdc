//! Parameter helpers shared by rule arguments and compact options
//!
//! Rule and option arguments are `/`-separated field lists whose numeric
//! fields accept decimal, hexadecimal (`0x`) and binary (leading `0`).

use crate::engine::CompileError;

/// Split a `/`-separated field list, dropping empty fields.
pub fn param_list(arg: &str) -> Vec<&str> {
    arg.split('/').filter(|field| !field.is_empty()).collect()
}

/// True when `value` reads as a number: a leading digit, or `-` and a digit.
pub fn looks_numeric(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Parse an integer literal.
///
/// `0x1F` is hexadecimal, any other literal with a leading `0` is binary
/// (`0101` is 5), everything else is decimal. A leading `-` negates and an
/// empty string is zero.
pub fn parse_int(field: &'static str, value: &str) -> Result<i64, CompileError> {
    let bad = || CompileError::BadNumber {
        field,
        value: value.to_string(),
    };

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if digits.is_empty() {
        return if negative { Err(bad()) } else { Ok(0) };
    }

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else if digits.len() > 1 && digits.starts_with('0') {
        i64::from_str_radix(&digits[1..], 2)
    } else {
        digits.parse::<i64>()
    }
    .map_err(|_| bad())?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Parse a non-negative integer literal into a `usize`.
pub fn parse_count(field: &'static str, value: &str) -> Result<usize, CompileError> {
    let parsed = parse_int(field, value)?;
    usize::try_from(parsed).map_err(|_| CompileError::OutOfRange {
        field,
        value: parsed,
    })
}
