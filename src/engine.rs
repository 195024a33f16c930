//! Pure conversion math over a rate snapshot.

use crate::error::ConvertError;
use crate::snapshot::RateSnapshot;

/// Converts `amount` from one currency to another by normalizing through the
/// snapshot's base currency.
///
/// No rounding is applied; presentation-level rounding belongs to the caller.
pub fn convert(
    snapshot: &RateSnapshot,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<f64, ConvertError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ConvertError::InvalidAmount(amount));
    }
    let from_rate = snapshot
        .rate(from)
        .ok_or_else(|| ConvertError::UnknownCurrency(from.to_string()))?;
    let to_rate = snapshot
        .rate(to)
        .ok_or_else(|| ConvertError::UnknownCurrency(to.to_string()))?;

    // Identity conversions return the amount untouched so a no-op never
    // accumulates floating-point drift.
    if from == to {
        return Ok(amount);
    }

    Ok(amount * (to_rate / from_rate))
}
