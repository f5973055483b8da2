//! Order status lifecycle.
//!
//! ```text
//! PENDING --pay--> IN_PREPARATION --status--> READY --status--> DELIVERED
//!    \
//!     +--cancel--> CANCELLED
//! ```
//!
//! `pay` and `cancel` only apply to pending orders. The generic status write
//! covers the kitchen steps and nothing else; DELIVERED and CANCELLED are
//! terminal.

use thiserror::Error;

use crate::models::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Pay,
    Cancel,
    SetStatus(OrderStatus),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("terminal order cannot change (order is {0})")]
    Terminal(OrderStatus),

    #[error("only pending orders can be paid (order is {0})")]
    PayNotPending(OrderStatus),

    #[error("can only cancel pending orders (order is {0})")]
    CancelNotPending(OrderStatus),

    #[error("pending orders change status only through pay or cancel")]
    PendingRequiresPayOrCancel,

    #[error("cannot move order from {from} to {to}")]
    Illegal { from: OrderStatus, to: OrderStatus },
}

/// Resolves the status reached by applying `action` to an order in `from`.
pub fn transition(from: OrderStatus, action: OrderAction) -> Result<OrderStatus, TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal(from));
    }

    match (from, action) {
        (OrderStatus::Pending, OrderAction::Pay) => Ok(OrderStatus::InPreparation),
        (_, OrderAction::Pay) => Err(TransitionError::PayNotPending(from)),

        (OrderStatus::Pending, OrderAction::Cancel) => Ok(OrderStatus::Cancelled),
        (_, OrderAction::Cancel) => Err(TransitionError::CancelNotPending(from)),

        (OrderStatus::Pending, OrderAction::SetStatus(_)) => {
            Err(TransitionError::PendingRequiresPayOrCancel)
        }
        (OrderStatus::InPreparation, OrderAction::SetStatus(OrderStatus::Ready)) => {
            Ok(OrderStatus::Ready)
        }
        (OrderStatus::Ready, OrderAction::SetStatus(OrderStatus::Delivered)) => {
            Ok(OrderStatus::Delivered)
        }
        (_, OrderAction::SetStatus(to)) => Err(TransitionError::Illegal { from, to }),
    }
}
