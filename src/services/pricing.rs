//! Line and aggregate pricing.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{CartLineItem, MenuOption, OrderLineItem};

/// Anything carrying a stored line total.
pub trait LineTotal {
    fn line_total(&self) -> Decimal;
}

impl LineTotal for CartLineItem {
    fn line_total(&self) -> Decimal {
        self.total_price
    }
}

impl LineTotal for OrderLineItem {
    fn line_total(&self) -> Decimal {
        self.total_price
    }
}

/// `(base_price + sum of selected option prices) * quantity`.
///
/// Names missing from `available_options` add nothing; legality of the
/// selection is checked by the catalog validator before pricing.
pub fn line_total(
    base_price: Decimal,
    quantity: u32,
    selected_options: &[String],
    available_options: &[MenuOption],
) -> Decimal {
    let prices: HashMap<&str, Decimal> = available_options
        .iter()
        .map(|option| (option.name.as_str(), option.price))
        .collect();

    let options_price: Decimal = selected_options
        .iter()
        .filter_map(|name| prices.get(name.as_str()))
        .sum();

    (base_price + options_price) * Decimal::from(quantity)
}

pub fn cart_total<T: LineTotal>(items: &[T]) -> Decimal {
    items.iter().map(LineTotal::line_total).sum()
}
