use crate::core::types::{OrderStatus, PaymentMethod};
use crate::models::{CartLineItem, Customizations};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes between placing an order and its estimated delivery
pub const ESTIMATED_DELIVERY_MINUTES: i64 = 30;

/// Snapshot of one cart line as it is submitted with an order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraftItem {
    /// Menu item identifier
    pub menu_item_id: String,
    /// Display name
    pub name: String,
    /// Units ordered
    pub quantity: u32,
    /// Selected customization options
    pub selected_customizations: Customizations,
    /// Free-text instructions for the kitchen
    pub special_instructions: String,
    /// Line total at the time of ordering
    pub item_total: f64,
}

impl From<&CartLineItem> for OrderDraftItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            menu_item_id: item.menu_item_id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            selected_customizations: item.selected_customizations.clone(),
            special_instructions: item.special_instructions.clone(),
            item_total: item.item_total,
        }
    }
}

/// Order assembled from the cart, not yet accepted by the order service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Restaurant taken from the first cart line
    pub restaurant_id: String,
    /// Ordered lines
    pub items: Vec<OrderDraftItem>,
    /// Delivery address chosen by the shopper
    pub delivery_address: String,
    /// Chosen payment method
    pub payment_method: PaymentMethod,
    /// Sum of line totals
    pub subtotal: f64,
    /// Flat delivery fee
    pub delivery_fee: f64,
    /// Subtotal plus delivery fee
    pub total: f64,
}

impl OrderDraft {
    /// Confirms the draft as a placed order at the current time
    pub fn confirm(self) -> Order {
        self.confirm_at(Utc::now())
    }

    /// Confirms the draft as a placed order at `order_time`
    pub fn confirm_at(self, order_time: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4(),
            draft: self,
            order_time,
            estimated_delivery: order_time + Duration::minutes(ESTIMATED_DELIVERY_MINUTES),
            status: OrderStatus::Confirmed,
        }
    }
}

/// Represents an order accepted by the order service
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier for the order
    pub id: Uuid,
    /// Submitted contents
    #[serde(flatten)]
    pub draft: OrderDraft,
    /// When the order was placed
    pub order_time: DateTime<Utc>,
    /// When the order is expected to arrive
    pub estimated_delivery: DateTime<Utc>,
    /// Current status
    pub status: OrderStatus,
}

impl Order {
    /// Zero-based tracker step of the current status
    pub fn progress(&self) -> Option<usize> {
        self.status.step()
    }

    /// True while the order is still on its way
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
