//! Checkout API used by the checkout page

use crate::config::CartConfig;
use crate::core::cart::Cart;
use crate::core::checkout::{build_draft, CheckoutRequest, CheckoutSummary};
use crate::core::error::Error;
use crate::models::{Notice, Order, OrderDraft};
use crate::Result;

/// API for turning the cart into a placed order
#[derive(Debug, Clone)]
pub struct CheckoutApi {
    /// Flat delivery fee added to every order
    delivery_fee: f64,
}

impl CheckoutApi {
    /// Creates a new CheckoutApi charging `delivery_fee`
    pub fn new(delivery_fee: f64) -> Self {
        Self { delivery_fee }
    }

    /// Creates a new CheckoutApi from configuration
    pub fn from_config(config: &CartConfig) -> Self {
        Self::new(config.delivery_fee)
    }

    /// Price breakdown of the current cart
    pub fn summary(&self, cart: &Cart) -> CheckoutSummary {
        CheckoutSummary::from_items(cart.items(), self.delivery_fee)
    }

    /// Builds the order that would be submitted for the current cart
    pub fn draft(&self, cart: &Cart, request: &CheckoutRequest) -> Result<OrderDraft> {
        build_draft(cart.items(), request, self.delivery_fee)
    }

    /// Places an order for the cart contents
    ///
    /// `submit` hands the draft to the order service. The cart is cleared only
    /// once the service has accepted the order; on any failure it is left as
    /// it was and an error notice is emitted.
    pub fn place_order<F>(&self, cart: &mut Cart, request: &CheckoutRequest, submit: F) -> Result<Order>
    where
        F: FnOnce(OrderDraft) -> Result<Order>,
    {
        let draft = match self.draft(cart, request) {
            Ok(draft) => draft,
            Err(e) => {
                if let Error::InvalidData(message) = &e {
                    cart.notify(&Notice::error(message.clone()));
                }
                return Err(e);
            }
        };

        let order = match submit(draft) {
            Ok(order) => order,
            Err(e) => {
                log::error!("Order submission failed: {}", e);
                cart.notify(&Notice::error("Failed to place order"));
                return Err(e);
            }
        };

        log::info!(
            "Placed order {} for restaurant {} totalling {:.2}",
            order.id,
            order.draft.restaurant_id,
            order.draft.total
        );
        cart.clear_cart();
        cart.notify(&Notice::success("Order placed successfully!"));

        Ok(order)
    }
}

impl Default for CheckoutApi {
    fn default() -> Self {
        Self::from_config(&CartConfig::default())
    }
}
