//! Shortest-form float formatting for text exports.
//!
//! Both writers print coordinates the way C's `%g` does: six significant
//! digits, trailing zeros removed, and exponent notation only for very large
//! or very small magnitudes. Rust's `{}` prints the shortest round-trip
//! representation instead, which differs for most non-dyadic values.

use std::fmt;

const PRECISION: i32 = 6;

/// Display adapter printing a float like `%g`.
///
/// ```
/// use voxport::io::Compact;
///
/// assert_eq!(Compact(0.5).to_string(), "0.5");
/// assert_eq!(Compact(1e6).to_string(), "1e+06");
/// assert_eq!(Compact(-0.0).to_string(), "-0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compact(pub f64);

impl From<f32> for Compact {
    fn from(value: f32) -> Self {
        Compact(value as f64)
    }
}

impl fmt::Display for Compact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_nan() {
            return f.write_str(if value.is_sign_negative() { "-nan" } else { "nan" });
        }
        if value.is_sign_negative() {
            f.write_str("-")?;
        }
        let value = value.abs();
        if value.is_infinite() {
            return f.write_str("inf");
        }
        if value == 0.0 {
            return f.write_str("0");
        }

        // The exponent of the rounded value decides the notation.
        let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
        let (mantissa, exponent) = match sci.split_once('e') {
            Some(parts) => parts,
            None => return f.write_str(&sci),
        };
        let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

        if exponent < -4 || exponent >= PRECISION {
            let sign = if exponent < 0 { '-' } else { '+' };
            write!(f, "{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
        } else {
            let decimals = (PRECISION - 1 - exponent) as usize;
            let fixed = format!("{:.*}", decimals, value);
            f.write_str(trim_zeros(&fixed))
        }
    }
}

fn trim_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(value: f32) -> String {
        Compact::from(value).to_string()
    }

    #[test]
    fn test_fixed_notation() {
        assert_eq!(g(0.0), "0");
        assert_eq!(g(1.0), "1");
        assert_eq!(g(-7.5), "-7.5");
        assert_eq!(g(8.5), "8.5");
        assert_eq!(g(100000.0), "100000");
        assert_eq!(g(0.0001), "0.0001");
        assert_eq!(g(123.456), "123.456");
    }

    #[test]
    fn test_six_significant_digits() {
        // f32 values widen to f64 before formatting.
        assert_eq!(g(0.1), "0.1");
        assert_eq!(g(1.0 / 3.0), "0.333333");
        assert_eq!(g(2.0 / 3.0), "0.666667");
        assert_eq!(Compact(1234567.0).to_string(), "1.23457e+06");
    }

    #[test]
    fn test_exponent_notation() {
        assert_eq!(Compact(1e6).to_string(), "1e+06");
        assert_eq!(Compact(0.00001).to_string(), "1e-05");
        assert_eq!(Compact(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Compact(1.5e100).to_string(), "1.5e+100");
        // Rounding up can push the value into exponent form.
        assert_eq!(Compact(999999.7).to_string(), "1e+06");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(g(-0.0), "-0");
        assert_eq!(g(f32::INFINITY), "inf");
        assert_eq!(g(f32::NEG_INFINITY), "-inf");
        assert_eq!(g(f32::NAN), "nan");
    }
}
