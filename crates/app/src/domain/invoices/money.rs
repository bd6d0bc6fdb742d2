//! Money helpers

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale every stored amount carries.
pub const AMOUNT_SCALE: u32 = 2;

/// Truncate towards zero at two decimal places and fix the scale at two.
#[must_use]
pub fn truncate_amount(amount: Decimal) -> Decimal {
    let mut truncated = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::ToZero);
    truncated.rescale(AMOUNT_SCALE);

    truncated
}

/// Line total for `quantity` units at `unit_price`, after truncating the price.
#[must_use]
pub fn line_total(unit_price: Decimal, quantity: u32) -> Decimal {
    truncate_amount(truncate_amount(unit_price) * Decimal::from(quantity))
}
