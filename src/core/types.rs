//! Common data types and enums

use serde::{Deserialize, Serialize};

/// Order status enum, in tracker order
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been accepted by the restaurant
    Confirmed,
    /// Kitchen is preparing the order
    Preparing,
    /// Courier has picked the order up
    PickedUp,
    /// Courier is on the way
    OutForDelivery,
    /// Order has reached the shopper
    Delivered,
    /// Order was cancelled before delivery
    Cancelled,
}

impl OrderStatus {
    /// Statuses shown on the tracker, in order
    pub const TRACKED: [OrderStatus; 5] = [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::PickedUp,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Converts the enum to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Converts a string to an OrderStatus enum
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "picked_up" => Some(OrderStatus::PickedUp),
            "out_for_delivery" => Some(OrderStatus::OutForDelivery),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Human-readable tracker label
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Confirmed => "Order Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// True while the order is still on its way
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OrderStatus::Confirmed
                | OrderStatus::Preparing
                | OrderStatus::PickedUp
                | OrderStatus::OutForDelivery
        )
    }

    /// Zero-based tracker step, `None` for cancelled orders
    pub fn step(&self) -> Option<usize> {
        Self::TRACKED.iter().position(|status| status == self)
    }
}

/// Payment method chosen at checkout
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    #[serde(rename = "cod")]
    CashOnDelivery,
    /// Credit or debit card
    Card,
    /// UPI transfer
    Upi,
    /// Digital wallet
    Wallet,
}

impl PaymentMethod {
    /// Converts the enum to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Wallet => "wallet",
        }
    }

    /// Converts a string to a PaymentMethod enum
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cod" => Some(PaymentMethod::CashOnDelivery),
            "card" => Some(PaymentMethod::Card),
            "upi" => Some(PaymentMethod::Upi),
            "wallet" => Some(PaymentMethod::Wallet),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        for status in OrderStatus::TRACKED {
            assert_eq!(OrderStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::from_str("cancelled"), Some(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::from_str("lost"), None);
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out_for_delivery\""
        );
    }

    #[test]
    fn test_status_steps() {
        assert_eq!(OrderStatus::Confirmed.step(), Some(0));
        assert_eq!(OrderStatus::Delivered.step(), Some(4));
        assert_eq!(OrderStatus::Cancelled.step(), None);
        assert!(OrderStatus::PickedUp.is_active());
        assert!(!OrderStatus::Delivered.is_active());
    }

    #[test]
    fn test_status_labels() {
        let labels: Vec<_> = OrderStatus::TRACKED.iter().map(OrderStatus::label).collect();
        assert_eq!(
            labels,
            ["Order Confirmed", "Preparing", "Picked Up", "Out for Delivery", "Delivered"]
        );
        assert_eq!(OrderStatus::Cancelled.label(), "Cancelled");
    }

    #[test]
    fn test_payment_method_strings() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::CashOnDelivery);
        assert_eq!(PaymentMethod::from_str("upi"), Some(PaymentMethod::Upi));
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cod\""
        );
    }
}
