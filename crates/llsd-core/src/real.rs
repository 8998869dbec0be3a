//! # Real Literals — Text Form of LLSD Reals
//!
//! LLSD text encodings carry reals as decimal numerals plus a handful of
//! special tokens for values a plain numeral cannot express:
//!
//! | Token | Value |
//! |-------|-------|
//! | `NaNS`, `NaNQ` | NaN |
//! | `+Infinity`, `Infinity` | +∞ |
//! | `-Infinity` | −∞ |
//! | `-Zero` | −0.0 |
//! | `+Zero`, `0.0` | +0.0 |
//!
//! Parsing is total: text outside the grammar yields `None`, which callers
//! treat as a failed coercion rather than an error.

/// Returns true if `f` is negative zero.
pub fn is_negative_zero(f: f64) -> bool {
    f == 0.0 && f.is_sign_negative()
}

/// Parse a real literal.
///
/// Accepts the special tokens above or a numeral matching
/// `[-+]? [0-9]* .? [0-9]+ ( [eE] [-+]? [0-9]+ )?`. Returns `None` for
/// anything else, including the empty string.
pub fn parse_real(text: &str) -> Option<f64> {
    match text {
        "-Infinity" => Some(f64::NEG_INFINITY),
        "-Zero" => Some(-0.0),
        "0.0" | "+Zero" => Some(0.0),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "NaNS" | "NaNQ" => Some(f64::NAN),
        _ if is_numeral(text) => text.parse().ok(),
        _ => None,
    }
}

fn is_numeral(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        i += 1;
    }

    // Mantissa: digits with at most one dot, ending in a digit.
    let start = i;
    let mut seen_dot = false;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => i += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
            }
            _ => break,
        }
    }
    if i == start || !bytes[i - 1].is_ascii_digit() {
        return false;
    }

    if i < bytes.len() {
        if !matches!(bytes[i], b'e' | b'E') {
            return false;
        }
        i += 1;
        if matches!(bytes.get(i), Some(b'-' | b'+')) {
            i += 1;
        }
        let digits = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits || i != bytes.len() {
            return false;
        }
    }

    true
}

/// Render a real in its canonical text form.
///
/// Non-finite values and negative zero use their tokens. Finite values use
/// the shortest digits that round-trip, in positional notation for
/// magnitudes in `[1e-6, 1e21)` and exponent notation (`1.5e+21`, `1e-7`)
/// outside it. Integral values carry no fraction (`3`, not `3.0`).
pub fn format_real(f: f64) -> String {
    if f.is_nan() {
        return "NaNS".to_string();
    }
    if f == f64::INFINITY {
        return "+Infinity".to_string();
    }
    if f == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }
    if is_negative_zero(f) {
        return "-Zero".to_string();
    }

    let magnitude = f.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return format!("{f}");
    }

    let exp = format!("{f:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}
