//! Checkout pricing and order drafts

use crate::core::error::Error;
use crate::core::types::PaymentMethod;
use crate::models::{CartLineItem, OrderDraft, OrderDraftItem};
use crate::Result;

use serde::{Deserialize, Serialize};

/// Price breakdown shown before an order is placed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    /// Sum of line totals
    pub subtotal: f64,
    /// Flat delivery fee
    pub delivery_fee: f64,
    /// Subtotal plus delivery fee
    pub total: f64,
    /// Sum of quantities
    pub item_count: u64,
}

impl CheckoutSummary {
    /// Prices the given line items
    pub fn from_items(items: &[CartLineItem], delivery_fee: f64) -> Self {
        let subtotal: f64 = items.iter().map(|item| item.item_total).sum();
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
        }
    }
}

/// What the shopper picked on the checkout page
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Delivery address, required
    pub delivery_address: String,
    /// Payment method
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl CheckoutRequest {
    /// Creates a request paying cash on delivery
    pub fn new(delivery_address: impl Into<String>) -> Self {
        Self {
            delivery_address: delivery_address.into(),
            payment_method: PaymentMethod::default(),
        }
    }

    /// Sets the payment method
    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }
}

/// Builds the order submitted for the given cart contents
///
/// The restaurant is taken from the first line item.
pub fn build_draft(
    items: &[CartLineItem],
    request: &CheckoutRequest,
    delivery_fee: f64,
) -> Result<OrderDraft> {
    if request.delivery_address.trim().is_empty() {
        return Err(Error::InvalidData("Please select a delivery address".into()));
    }

    let first = items
        .first()
        .ok_or_else(|| Error::InvalidState("Cart is empty".into()))?;

    let restaurant_id = first
        .restaurant_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidData("Invalid cart data".into()))?;

    let summary = CheckoutSummary::from_items(items, delivery_fee);

    Ok(OrderDraft {
        restaurant_id,
        items: items.iter().map(OrderDraftItem::from).collect(),
        delivery_address: request.delivery_address.clone(),
        payment_method: request.payment_method,
        subtotal: summary.subtotal,
        delivery_fee: summary.delivery_fee,
        total: summary.total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewCartItem;

    fn items() -> Vec<CartLineItem> {
        vec![
            NewCartItem::new("m1", "Pizza", 200.0)
                .with_quantity(2)
                .with_restaurant("r1")
                .into_line_item(),
            NewCartItem::new("m2", "Burger", 150.0)
                .with_restaurant("r1")
                .into_line_item(),
        ]
    }

    #[test]
    fn test_summary_adds_delivery_fee() {
        let summary = CheckoutSummary::from_items(&items(), 40.0);

        assert_eq!(summary.subtotal, 550.0);
        assert_eq!(summary.delivery_fee, 40.0);
        assert_eq!(summary.total, 590.0);
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let summary = CheckoutSummary::from_items(&[], 40.0);
        assert_eq!(summary.subtotal, 0.0);
        assert_eq!(summary.item_count, 0);
    }

    #[test]
    fn test_build_draft() {
        let request = CheckoutRequest::new("12 MG Road").with_payment_method(PaymentMethod::Upi);
        let draft = build_draft(&items(), &request, 40.0).unwrap();

        assert_eq!(draft.restaurant_id, "r1");
        assert_eq!(draft.items.len(), 2);
        assert_eq!(draft.items[0].item_total, 400.0);
        assert_eq!(draft.payment_method, PaymentMethod::Upi);
        assert_eq!(draft.total, 590.0);
    }

    #[test]
    fn test_build_draft_rejections() {
        let request = CheckoutRequest::new("12 MG Road");

        let empty = build_draft(&[], &request, 40.0);
        assert!(matches!(empty, Err(Error::InvalidState(_))));

        let no_address = build_draft(&items(), &CheckoutRequest::new("  "), 40.0);
        assert!(matches!(no_address, Err(Error::InvalidData(_))));

        let orphan = vec![NewCartItem::new("m1", "Pizza", 200.0).into_line_item()];
        let result = build_draft(&orphan, &request, 40.0);
        assert!(matches!(result, Err(Error::InvalidData(ref m)) if m == "Invalid cart data"));
    }
}
