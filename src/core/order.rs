//! Order status transitions

use crate::core::error::Error;
use crate::core::types::OrderStatus;
use crate::models::Order;
use crate::Result;

/// Order tracker for handling order status transitions
#[derive(Debug, Default)]
pub struct OrderTracker;

impl OrderTracker {
    /// Creates a new OrderTracker
    pub fn new() -> Self {
        Self
    }

    /// Moves an order to `next`, rejecting transitions the tracker does not allow
    pub fn advance(&self, order: &mut Order, next: OrderStatus) -> Result<()> {
        if !self.is_valid_transition(&order.status, &next) {
            return Err(Error::InvalidState(format!(
                "Invalid status transition for order {}: from {} to {}",
                order.id,
                order.status.as_str(),
                next.as_str()
            )));
        }

        log::debug!(
            "Order {} moved from {} to {}",
            order.id,
            order.status.as_str(),
            next.as_str()
        );
        order.status = next;

        Ok(())
    }

    /// Moves an order to the next tracked status
    pub fn advance_next(&self, order: &mut Order) -> Result<OrderStatus> {
        let next = order
            .status
            .step()
            .and_then(|step| OrderStatus::TRACKED.get(step + 1).copied())
            .ok_or_else(|| {
                Error::InvalidState(format!(
                    "Order {} has no next status after {}",
                    order.id,
                    order.status.as_str()
                ))
            })?;

        self.advance(order, next)?;
        Ok(next)
    }

    /// Checks if a status transition is valid
    pub fn is_valid_transition(&self, from: &OrderStatus, to: &OrderStatus) -> bool {
        match (from, to) {
            (OrderStatus::Confirmed, OrderStatus::Preparing) => true,
            (OrderStatus::Preparing, OrderStatus::PickedUp) => true,
            (OrderStatus::PickedUp, OrderStatus::OutForDelivery) => true,
            (OrderStatus::OutForDelivery, OrderStatus::Delivered) => true,
            (_, OrderStatus::Cancelled) => from.is_active(), // Can cancel until delivered
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::PaymentMethod;
    use crate::models::OrderDraft;

    fn create_test_order() -> Order {
        OrderDraft {
            restaurant_id: "r1".to_string(),
            items: Vec::new(),
            delivery_address: "12 MG Road".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
            subtotal: 200.0,
            delivery_fee: 40.0,
            total: 240.0,
        }
        .confirm()
    }

    #[test]
    fn test_valid_order_flow() {
        let tracker = OrderTracker::new();
        let mut order = create_test_order();

        tracker.advance(&mut order, OrderStatus::Preparing).unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);

        assert_eq!(
            tracker.advance_next(&mut order).unwrap(),
            OrderStatus::PickedUp
        );
        assert_eq!(
            tracker.advance_next(&mut order).unwrap(),
            OrderStatus::OutForDelivery
        );
        assert_eq!(
            tracker.advance_next(&mut order).unwrap(),
            OrderStatus::Delivered
        );
        assert!(!order.is_active());
        assert_eq!(order.progress(), Some(4));

        // Nothing follows delivery
        assert!(tracker.advance_next(&mut order).is_err());
    }

    #[test]
    fn test_invalid_transition() {
        let tracker = OrderTracker::new();
        let mut order = create_test_order();

        // Try to deliver before preparing
        let result = tracker.advance(&mut order, OrderStatus::Delivered);
        assert!(result.is_err());

        // Ensure the status hasn't changed
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_cancellation() {
        let tracker = OrderTracker::new();
        let mut order = create_test_order();

        tracker.advance(&mut order, OrderStatus::Cancelled).unwrap();
        assert_eq!(order.progress(), None);
        assert!(tracker.advance_next(&mut order).is_err());

        let mut delivered = create_test_order();
        delivered.status = OrderStatus::Delivered;
        assert!(tracker
            .advance(&mut delivered, OrderStatus::Cancelled)
            .is_err());
    }
}
