//! The increment primitive shared by the Bump rule, alphabetic Insert
//! counters and collision avoidance.
//!
//! Three domains are recognised by the last character of the string:
//!
//! - **numeric**: the trailing digit run is incremented as a zero-padded
//!   integer whose width may grow (`099` + 1 = `100`)
//! - **alphabetic**: only the last letter moves; overflow appends a letter
//!   (`Z` + 1 = `AA`) and underflow wraps to a doubled letter (`A` - 1 = `ZZ`)
//! - **punctuation**: the decimal step is appended (`x{}` + 1 = `x{}1`)

/// Longest digit run treated as one number. Digits beyond it stay literal.
const MAX_DIGITS: usize = 36;

/// Successor of `name` under `step`.
pub fn next_name(name: &str, step: i64) -> String {
    next_name_from(name, step, 0)
}

/// Successor of `name` under `step`, where only the digits at or after byte
/// `offset` may form the numeric field.
///
/// Collision avoidance uses the offset so that a freshly appended counter
/// never merges with digits that were already part of the root.
pub fn next_name_from(name: &str, step: i64, offset: usize) -> String {
    match name.chars().last() {
        Some(c) if c.is_ascii_digit() => {
            let offset = if name.is_char_boundary(offset) { offset } else { 0 };
            let window = &name[offset.min(name.len())..];
            let digits = window.len() - window.trim_end_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 {
                return format!("{name}{step}");
            }
            let width = digits.min(MAX_DIGITS);
            let (head, run) = name.split_at(name.len() - width);
            match run.parse::<i128>() {
                Ok(value) => {
                    let value = value + i128::from(step);
                    format!("{head}{value:0width$}")
                }
                Err(_) => format!("{name}{step}"),
            }
        }
        Some(c) if c.is_ascii_alphabetic() => {
            let head = &name[..name.len() - 1];
            format!("{head}{}", next_letter(c, step))
        }
        _ => format!("{name}{step}"),
    }
}

/// Replacement text for the final letter `c` moved by `step`.
fn next_letter(c: char, step: i64) -> String {
    let (first, last) = if c.is_ascii_lowercase() {
        (b'a', b'z')
    } else {
        (b'A', b'Z')
    };
    let next = i64::from(c as u8) + step.rem_euclid(26);
    let last = i64::from(last);
    let letter = |ordinal: i64| char::from(ordinal as u8);

    if step < 0 {
        if next > last {
            letter(next - 26).to_string()
        } else {
            format!("{}{}", letter(last), letter(next))
        }
    } else if next > last {
        format!("{}{}", char::from(first), letter(next - 26))
    } else {
        letter(next).to_string()
    }
}
