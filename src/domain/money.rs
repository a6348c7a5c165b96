//! Monetary types and the reporting rounding rule.
//!
//! Every currency and percentage figure that leaves the analytics engine is
//! rounded to two decimal places, half away from zero: `0.125` becomes `0.13`
//! and `-0.125` becomes `-0.13`. Intermediate sums keep full precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places used for reported figures.
pub const REPORT_SCALE: u32 = 2;

/// Round a reported figure to two decimal places, half away from zero.
///
/// The result always carries a scale of two so serialized values are
/// byte-stable (`250` is reported as `250.00`).
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(REPORT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(REPORT_SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// Divide, returning zero when the denominator is zero.
#[must_use]
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
