//! Value types that can be stored in a [`Parameter`](crate::Parameter).
//!
//! Each type knows its canonical text form (used by the settings file) and,
//! for the numeric scalars, how to clamp itself into optional bounds.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

use crate::complex::Complex64;
use crate::error::{ParamsError, Result};

/// Text values accepted as `true` by boolean parameters (case-insensitive).
pub const TRUE_VALUES: [&str; 5] = ["1", "true", "t", "yes", "y"];

/// The concrete kind of a parameter, used for type-erased inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    String,
    Path,
    Uuid,
    Boolean,
    Integer,
    Real,
    IntegerSequence,
    RealSequence,
    ComplexSequence,
}

impl ParameterKind {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Path => "path",
            Self::Uuid => "uuid",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::IntegerSequence => "integer sequence",
            Self::RealSequence => "real sequence",
            Self::ComplexSequence => "complex sequence",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value that can live inside a parameter.
pub trait ParameterValue: Clone + PartialEq + fmt::Debug + 'static {
    const KIND: ParameterKind;

    /// Canonical text form written to settings files.
    fn to_text(&self) -> String;

    /// Parse the canonical text form.
    fn from_text(text: &str) -> Result<Self>;

    /// Constrain into `[lower, upper]`. Only numeric scalars clamp.
    fn clamp_to(self, _lower: Option<&Self>, _upper: Option<&Self>) -> Self {
        self
    }

    /// Equality used to detect no-op writes. NaN matches NaN.
    fn same_value(&self, other: &Self) -> bool {
        self == other
    }
}

/// Marker for values that support lower/upper bounds.
pub trait Bounded: ParameterValue + PartialOrd {}

impl Bounded for i64 {}
impl Bounded for f64 {}

impl ParameterValue for String {
    const KIND: ParameterKind = ParameterKind::String;

    fn to_text(&self) -> String {
        self.clone()
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(text.to_string())
    }
}

impl ParameterValue for PathBuf {
    const KIND: ParameterKind = ParameterKind::Path;

    fn to_text(&self) -> String {
        self.to_string_lossy().into_owned()
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(PathBuf::from(text))
    }
}

impl ParameterValue for Uuid {
    const KIND: ParameterKind = ParameterKind::Uuid;

    fn to_text(&self) -> String {
        self.hyphenated().to_string()
    }

    fn from_text(text: &str) -> Result<Self> {
        Uuid::parse_str(text.trim()).map_err(|e| ParamsError::parse(Self::KIND.label(), text, e))
    }
}

impl ParameterValue for bool {
    const KIND: ParameterKind = ParameterKind::Boolean;

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Result<Self> {
        let lowered = text.trim().to_lowercase();
        Ok(TRUE_VALUES.contains(&lowered.as_str()))
    }
}

impl ParameterValue for i64 {
    const KIND: ParameterKind = ParameterKind::Integer;

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_text(text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .map_err(|e| ParamsError::parse(Self::KIND.label(), text, e))
    }

    fn clamp_to(self, lower: Option<&Self>, upper: Option<&Self>) -> Self {
        let mut value = self;
        if let Some(&lower) = lower {
            value = value.max(lower);
        }
        if let Some(&upper) = upper {
            value = value.min(upper);
        }
        value
    }
}

impl ParameterValue for f64 {
    const KIND: ParameterKind = ParameterKind::Real;

    fn to_text(&self) -> String {
        format!("{self:?}")
    }

    fn from_text(text: &str) -> Result<Self> {
        text.trim()
            .parse()
            .map_err(|e| ParamsError::parse(Self::KIND.label(), text, e))
    }

    // f64::max/min return the non-NaN operand, so NaN reads as a bound.
    fn clamp_to(self, lower: Option<&Self>, upper: Option<&Self>) -> Self {
        let mut value = self;
        if let Some(&lower) = lower {
            value = value.max(lower);
        }
        if let Some(&upper) = upper {
            value = value.min(upper);
        }
        value
    }

    fn same_value(&self, other: &Self) -> bool {
        same_real(*self, *other)
    }
}

impl ParameterValue for Vec<i64> {
    const KIND: ParameterKind = ParameterKind::IntegerSequence;

    fn to_text(&self) -> String {
        join(self.iter().map(ToString::to_string))
    }

    fn from_text(text: &str) -> Result<Self> {
        text.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .parse()
                    .map_err(|e| ParamsError::parse(Self::KIND.label(), text, e))
            })
            .collect()
    }
}

impl ParameterValue for Vec<f64> {
    const KIND: ParameterKind = ParameterKind::RealSequence;

    fn to_text(&self) -> String {
        join(self.iter().map(|x| format!("{x:?}")))
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(parse_lenient(text, f64::NAN))
    }

    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(&a, &b)| same_real(a, b))
    }
}

impl ParameterValue for Vec<Complex64> {
    const KIND: ParameterKind = ParameterKind::ComplexSequence;

    fn to_text(&self) -> String {
        join(self.iter().map(ToString::to_string))
    }

    fn from_text(text: &str) -> Result<Self> {
        Ok(parse_lenient(text, Complex64::NAN))
    }

    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|(a, b)| same_real(a.re, b.re) && same_real(a.im, b.im))
    }
}

fn same_real(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn join(tokens: impl Iterator<Item = String>) -> String {
    tokens.collect::<Vec<_>>().join(",")
}

/// Parse a `,`-separated list, substituting `sentinel` for malformed tokens.
fn parse_lenient<E: std::str::FromStr + Copy>(text: &str, sentinel: E) -> Vec<E> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.split(',')
        .map(|token| {
            token.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(token, "substituting NaN for malformed sequence element");
                sentinel
            })
        })
        .collect()
}
