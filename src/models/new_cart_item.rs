use crate::models::cart_item::{checked_line_total, line_total, CartLineItem, Customizations};
use serde::{Deserialize, Serialize};

/// Item descriptor handed to the cart by the catalog
///
/// `menu_item_id`, `name` and `price` are mandatory; the rest is optional and
/// takes its default when the item becomes a line item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCartItem {
    /// Menu item identifier
    pub menu_item_id: String,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Units to add, 1 when absent or zero
    pub quantity: Option<u32>,
    /// Restaurant the item belongs to
    pub restaurant_id: Option<String>,
    /// Image URL
    pub image: Option<String>,
    /// Selected customization options
    pub selected_customizations: Option<Customizations>,
    /// Free-text instructions for the kitchen
    pub special_instructions: Option<String>,
}

impl NewCartItem {
    /// Creates a new NewCartItem with required fields
    pub fn new(menu_item_id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            price,
            ..Self::default()
        }
    }

    /// Sets the number of units to add
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the owning restaurant
    pub fn with_restaurant(mut self, restaurant_id: impl Into<String>) -> Self {
        self.restaurant_id = Some(restaurant_id.into());
        self
    }

    /// Sets the image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the selected customizations
    pub fn with_customizations(mut self, customizations: Customizations) -> Self {
        self.selected_customizations = Some(customizations);
        self
    }

    /// Sets the special instructions
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }

    /// Units this descriptor adds to the cart
    pub fn requested_quantity(&self) -> u32 {
        match self.quantity {
            Some(0) | None => 1,
            Some(quantity) => quantity,
        }
    }

    /// Checks the fields the cart requires, returning the first problem found
    ///
    /// Only empty ids and names are missing; whitespace is a value like any other.
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.menu_item_id.is_empty() {
            return Err("missing menu item id");
        }
        if self.name.is_empty() {
            return Err("missing name");
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err("missing or non-positive price");
        }
        if checked_line_total(self.requested_quantity(), self.price).is_none() {
            return Err("line total overflows");
        }
        Ok(())
    }

    /// Converts the descriptor into a fresh line item
    pub fn into_line_item(self) -> CartLineItem {
        let quantity = self.requested_quantity();
        CartLineItem {
            item_total: line_total(quantity, self.price),
            menu_item_id: self.menu_item_id,
            restaurant_id: self.restaurant_id,
            name: self.name,
            image: self.image,
            price: self.price,
            quantity,
            selected_customizations: self.selected_customizations.unwrap_or_default(),
            special_instructions: self.special_instructions.unwrap_or_default(),
        }
    }
}
