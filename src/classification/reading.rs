use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ReadingError;

/// Marker written in front of a reading pegged at the instrument's maximum
pub const GREATER_THAN_MARKER: char = '>';

// Optional sign, then ASCII digits with an optional fractional part. No exponents.
static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").unwrap());

/// A raw user-entered test value after parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Nothing entered yet
    Empty,
    /// A plain non-negative decimal
    Value(Decimal),
    /// Prefixed with `>`, e.g. ">200". The trailing number is kept if it parses.
    OverRange(Option<Decimal>),
    /// Anything else
    Invalid(ReadingError),
}

impl Reading {
    /// Parse a raw field value. Never fails; bad input becomes `Invalid`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Reading::Empty;
        }

        if let Some(rest) = trimmed.strip_prefix(GREATER_THAN_MARKER) {
            return Reading::OverRange(parse_decimal(rest).ok());
        }

        match parse_decimal(trimmed) {
            Ok(value) => Reading::Value(value),
            Err(err) => Reading::Invalid(err),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reading::Empty)
    }

    /// The numeric value, if this is a plain reading
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Reading::Value(value) => Some(*value),
            _ => None,
        }
    }
}

/// Parse a whole string as a non-negative decimal number
///
/// Surrounding whitespace is ignored. Trailing garbage, exponents, and
/// values `Decimal` cannot hold exactly are rejected.
pub fn parse_decimal(raw: &str) -> Result<Decimal, ReadingError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ReadingError::Empty);
    }

    if !DECIMAL_REGEX.is_match(trimmed) {
        return Err(ReadingError::NotANumber(trimmed.to_string()));
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    // Normalise ".5" and "5." into forms Decimal accepts
    let mut normalised = String::with_capacity(digits.len() + 2);
    if digits.starts_with('.') {
        normalised.push('0');
    }
    normalised.push_str(digits);
    if normalised.ends_with('.') {
        normalised.push('0');
    }

    let fraction_digits = normalised
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    if fraction_digits > Decimal::MAX_SCALE as usize {
        return Err(ReadingError::NotANumber(trimmed.to_string()));
    }

    let value = Decimal::from_str(&normalised)
        .map_err(|_| ReadingError::NotANumber(trimmed.to_string()))?;

    // Decimal rounds digits it cannot hold; a rounded reading is not the one entered
    if value.scale() as usize != fraction_digits {
        return Err(ReadingError::NotANumber(trimmed.to_string()));
    }

    if negative && !value.is_zero() {
        return Err(ReadingError::Negative(trimmed.to_string()));
    }

    Ok(value)
}
