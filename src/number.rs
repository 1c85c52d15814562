//! Numeric literal rounding.

/// Values this close to an integer are written without a fractional part.
const INTEGER_TOLERANCE: f64 = 1e-6;

/// Round a numeric token to `precision` decimal places.
///
/// Rounding is exact on the binary value with ties to even, so `-2.05`
/// (stored just above -2.05) becomes `-2` and `3.14159` becomes `3.1`.
/// Results within 1e-6 of an integer are emitted as that integer. Tokens that
/// don't parse, or overflow to infinity, come back unchanged.
pub fn round_number(token: &str, precision: u8) -> String {
    let value = match token.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return token.to_string(),
    };

    let s = format!("{:.prec$}", value, prec = precision as usize);
    let rounded: f64 = match s.parse() {
        Ok(v) => v,
        Err(_) => return token.to_string(),
    };

    if (rounded - rounded.round()).abs() < INTEGER_TOLERANCE {
        return format_integer(rounded.round());
    }

    trim_fraction(s)
}

fn format_integer(n: f64) -> String {
    if n == 0.0 {
        // covers -0
        return "0".into();
    }
    format!("{:.0}", n)
}

/// Trim trailing zeros after the decimal point: 12.300 -> 12.3
fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}
