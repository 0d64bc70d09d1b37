//! Minimal complex number used by complex-sequence parameters.

use std::fmt;
use std::str::FromStr;

/// Double precision complex number.
///
/// Text form is `re±imj` (for example `1.5-2j`). Parsing also accepts an
/// `i` suffix, surrounding parentheses, and purely real or purely imaginary
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex64 {
    pub re: f64,
    pub im: f64,
}

impl Complex64 {
    /// Placeholder stored for tokens that fail to parse.
    pub const NAN: Self = Self {
        re: f64::NAN,
        im: f64::NAN,
    };

    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn is_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl fmt::Display for Complex64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.im.is_sign_negative() && !self.im.is_nan() {
            '-'
        } else {
            '+'
        };
        write!(f, "{:?}{}{:?}j", self.re, sign, self.im.abs())
    }
}

/// Error returned when a complex literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComplexError(String);

impl fmt::Display for ParseComplexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid complex literal: {}", self.0)
    }
}

impl std::error::Error for ParseComplexError {}

impl FromStr for Complex64 {
    type Err = ParseComplexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseComplexError(s.to_string());
        let mut text = s.trim();
        if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
            text = inner.trim();
        }
        if text.is_empty() {
            return Err(invalid());
        }

        let Some(body) = text.strip_suffix(['j', 'J', 'i']) else {
            let re = text.parse::<f64>().map_err(|_| invalid())?;
            return Ok(Self::new(re, 0.0));
        };

        match split_point(body) {
            Some(at) => {
                let re = body[..at].parse::<f64>().map_err(|_| invalid())?;
                let im = parse_imaginary(&body[at..]).ok_or_else(invalid)?;
                Ok(Self::new(re, im))
            }
            None => {
                let im = parse_imaginary(body).ok_or_else(invalid)?;
                Ok(Self::new(0.0, im))
            }
        }
    }
}

/// Byte offset of the sign that separates the real and imaginary parts.
fn split_point(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
}

fn parse_imaginary(text: &str) -> Option<f64> {
    match text {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        other => other.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_literal() {
        assert_eq!("1.5-2j".parse::<Complex64>(), Ok(Complex64::new(1.5, -2.0)));
        assert_eq!("(3+4j)".parse::<Complex64>(), Ok(Complex64::new(3.0, 4.0)));
        assert_eq!("1e-05+2e+03i".parse::<Complex64>(), Ok(Complex64::new(1e-5, 2e3)));
    }

    #[test]
    fn test_parse_partial_literals() {
        assert_eq!("2.5".parse::<Complex64>(), Ok(Complex64::new(2.5, 0.0)));
        assert_eq!("-3j".parse::<Complex64>(), Ok(Complex64::new(0.0, -3.0)));
        assert_eq!("j".parse::<Complex64>(), Ok(Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Complex64>().is_err());
        assert!("abc".parse::<Complex64>().is_err());
        assert!("1+xj".parse::<Complex64>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for value in [
            Complex64::new(1.0, 2.0),
            Complex64::new(-0.25, -1e-7),
            Complex64::new(f64::INFINITY, f64::NEG_INFINITY),
        ] {
            let text = value.to_string();
            assert_eq!(text.parse::<Complex64>(), Ok(value), "{text}");
        }
    }

    #[test]
    fn test_nan_display_parses_back_as_nan() {
        let text = Complex64::NAN.to_string();
        assert_eq!(text, "NaN+NaNj");
        assert!(text.parse::<Complex64>().unwrap().is_nan());
    }
}
