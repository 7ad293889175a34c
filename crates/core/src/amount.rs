//! Amount arithmetic helpers.
//!
//! Every monetary value and quantity in the workspace is a [`Decimal`]. The
//! legacy screen rounded each derived figure to two decimal places before
//! combining it with anything else; `round2` is that single rounding rule.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, half away from zero.
///
/// Applied to every derived figure (line subtotal, tax, total) before it is
/// combined further, so intermediate rounding matches the legacy behavior.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Coerce raw field text into an amount, treating anything non-numeric as zero.
///
/// The entry screen let users type freely into numeric cells; unparseable
/// input silently became zero rather than an error.
pub fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or(Decimal::ZERO)
}
