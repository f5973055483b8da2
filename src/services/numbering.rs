//! Year-scoped sequential order numbers: `FT-{year}-{seq:04}`.
//!
//! Allocation is read-then-compute, so two concurrent checkouts can land on
//! the same number. The store's unique index on `order_number` rejects the
//! second insert and the caller asks for a fresh number.

use std::fmt;

use serde_json::Value;

use crate::{
    error::AppResult,
    store::{self, DocumentStore, Filter, Sort},
};

pub const ORDER_NUMBER_PREFIX: &str = "FT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNumber {
    pub year: i32,
    pub sequence: u64,
}

impl OrderNumber {
    pub fn new(year: i32, sequence: u64) -> Self {
        Self { year, sequence }
    }

    /// Parses `FT-{year}-{seq}`; the sequence may be wider than four digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, '-');
        if parts.next()? != ORDER_NUMBER_PREFIX {
            return None;
        }
        let year = parts.next()?.parse().ok()?;
        let sequence = parts.next()?.parse().ok()?;
        Some(Self { year, sequence })
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ORDER_NUMBER_PREFIX}-{}-{:04}", self.year, self.sequence)
    }
}

/// Next free number in `year`: one past the highest sequence already used,
/// or 1 for an empty year.
pub async fn next_order_number(store: &dyn DocumentStore, year: i32) -> AppResult<OrderNumber> {
    let latest = store
        .find_one(
            store::ORDERS,
            &Filter::all().eq("year", year),
            Some(&Sort::desc("sequence")),
        )
        .await?;

    let last = latest.and_then(|doc| {
        doc.get("sequence").and_then(Value::as_u64).or_else(|| {
            doc.get("order_number")
                .and_then(Value::as_str)
                .and_then(OrderNumber::parse)
                .map(|number| number.sequence)
        })
    });

    Ok(OrderNumber::new(year, last.unwrap_or(0) + 1))
}
