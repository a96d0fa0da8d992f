//! Layer heights and numeric formatting

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Z height of a print layer (mm)
///
/// Wraps an `f64` with a total order so heights can key ordered maps.
/// Heights compare by exact value, so `;12` and `;12.0` name the same layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Height(f64);

impl Height {
    /// Create a height from a raw value
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Height {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Height {}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> Ordering {
        // -0.0 and 0.0 must collapse to one key
        if self.0 == other.0 {
            Ordering::Equal
        } else {
            self.0.total_cmp(&other.0)
        }
    }
}

impl From<f64> for Height {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Height> for f64 {
    fn from(height: Height) -> Self {
        height.0
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format a number in general notation with `precision` significant digits.
///
/// Fixed notation is used when the decimal exponent lies in `-4..precision`,
/// scientific notation (`1.5e+05`) otherwise. Trailing zeros and a dangling
/// decimal point are removed in both cases.
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
