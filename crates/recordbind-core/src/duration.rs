//! Duration grammar.
//!
//! A duration is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix: `"300ms"`, `"1.5h"`, `"3h3s"`.
//! Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. The bare
//! string `"0"` is the only unit-less duration. A leading `-` is accepted
//! only for zero since [`Duration`] cannot be negative.

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_SECOND: u128 = 1_000_000_000;

// Digits past this are dropped; the product with the hour scale still fits u128.
const MAX_FRACTION_DIGITS: usize = 18;

/// Error returned by [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Empty input or a component with no digits.
    #[error("invalid duration \"{0}\"")]
    Invalid(String),
    /// A number without a unit.
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),
    /// A unit outside the grammar.
    #[error("unknown unit \"{unit}\" in duration \"{input}\"")]
    UnknownUnit {
        /// The offending unit.
        unit: String,
        /// The full input.
        input: String,
    },
    /// The duration does not fit.
    #[error("duration \"{0}\" overflows")]
    Overflow(String),
    /// A negative, non-zero duration.
    #[error("negative duration \"{0}\"")]
    Negative(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        "h" => 3_600 * NANOS_PER_SECOND,
        _ => return None,
    };
    Some(nanos)
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Parses a duration string.
///
/// # Example
///
/// ```
/// use recordbind_core::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("3h3s").unwrap(), Duration::from_secs(10_803));
/// assert_eq!(parse_duration("300us").unwrap(), Duration::from_micros(300));
/// assert!(parse_duration("12").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let invalid = || DurationError::Invalid(input.to_owned());
    let overflow = || DurationError::Overflow(input.to_owned());

    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        rest = after_whole;

        let mut fraction = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, after_fraction) = split_digits(after_dot);
            fraction = digits;
            rest = after_fraction;
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after_unit) = rest.split_at(unit_end);
        rest = after_unit;
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_owned()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_owned(),
            input: input.to_owned(),
        })?;

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(overflow)?;

        if !fraction.is_empty() {
            let digits = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = digits.parse().map_err(|_| invalid())?;
            let denominator = 10_u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(numerator * scale / denominator)
                .ok_or_else(overflow)?;
        }
        total = total.checked_add(nanos).ok_or_else(overflow)?;
    }

    if negative && total != 0 {
        return Err(DurationError::Negative(input.to_owned()));
    }
    let secs = u64::try_from(total / NANOS_PER_SECOND).map_err(|_| overflow())?;
    let subsec = (total % NANOS_PER_SECOND) as u32;
    Ok(Duration::new(secs, subsec))
}
