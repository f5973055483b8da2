use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timestamps are written with a fixed width so that the stored text sorts
/// chronologically.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Current time truncated to what survives a round trip through a document.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::parse_from_rfc3339(&now.to_rfc3339_opts(SecondsFormat::Micros, true))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "9.99")]
    pub price: Decimal,
    pub available: bool,
    /// Names of the options this item may be ordered with.
    pub options: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuOption {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[schema(value_type = String, example = "1.50")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLineItem {
    pub menu_item_id: String,
    pub quantity: u32,
    pub selected_options: Vec<String>,
    pub note: Option<String>,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Cart ownership key, see `middleware::cart_key`.
    pub owner: String,
    pub items: Vec<CartLineItem>,
    #[schema(value_type = String)]
    pub total: Decimal,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Line of a placed order. Name and prices are copied from the catalog at
/// checkout and never follow later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLineItem {
    pub menu_item_id: String,
    pub name: String,
    #[schema(value_type = String)]
    pub base_price: Decimal,
    /// Base price plus the selected options, for a single unit.
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub selected_options: Vec<String>,
    pub note: Option<String>,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InPreparation,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::InPreparation => "IN_PREPARATION",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[schema(example = "FT-2025-0001")]
    pub order_number: String,
    /// Year partition of `order_number`.
    pub year: i32,
    /// Sequence within the year partition.
    pub sequence: u64,
    pub items: Vec<OrderLineItem>,
    #[schema(value_type = String)]
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}
