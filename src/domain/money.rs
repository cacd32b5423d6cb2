use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A monetary value rounded to cents.
///
/// Amounts travel through the pipeline as `f64` and accumulate rounding error
/// that depends on summation order. `Money` is the comparison and reporting
/// form: two sums that agree to the cent compare equal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(pub Decimal);

impl Money {
    /// Rounds `value` half away from zero to two decimal places.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        Decimal::from_f64(value)
            .map(|d| Self(d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
