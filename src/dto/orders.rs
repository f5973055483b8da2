use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderStatus, timestamp};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// Order fields a status change writes.
#[derive(Debug, Serialize)]
pub(crate) struct StatusChange {
    pub status: OrderStatus,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}
