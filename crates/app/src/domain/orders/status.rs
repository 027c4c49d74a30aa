//! Order status transitions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an order is in fulfilment.
///
/// `Pending -> Processing -> Shipped -> Delivered` is the expected path and
/// `Cancelled` is reachable from any non-terminal status. `Delivered` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

/// Statuses whose order totals count as revenue.
pub const REVENUE_COUNTED_STATUSES: &[OrderStatus] = &[OrderStatus::Delivered];

impl OrderStatus {
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    #[must_use]
    pub fn counts_as_revenue(self) -> bool {
        REVENUE_COUNTED_STATUSES.contains(&self)
    }

    /// Move to `next`, which is allowed from any non-terminal status.
    ///
    /// # Errors
    ///
    /// Returns [`StatusTransitionError`] when `self` is terminal.
    pub fn transition_to(self, next: Self) -> Result<Self, StatusTransitionError> {
        if self.is_terminal() {
            return Err(StatusTransitionError {
                from: self,
                to: next,
            });
        }

        Ok(next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownOrderStatus(value.to_string()))
    }
}

/// A status change attempted on a terminal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("order is {from} and can no longer move to {to}")]
pub struct StatusTransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}
