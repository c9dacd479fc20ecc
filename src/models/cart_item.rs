use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Customization choices attached to a line item, opaque to the cart
pub type Customizations = BTreeMap<String, Value>;

/// Represents one distinct menu item held in the cart
///
/// The serialized form is the persisted snapshot layout, so field names are
/// kept in camelCase for reloads of snapshots written by earlier clients.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Menu item identifier, unique within a cart
    #[serde(deserialize_with = "id_format::deserialize")]
    pub menu_item_id: String,
    /// Restaurant the item was added from
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "id_format::deserialize_option"
    )]
    pub restaurant_id: Option<String>,
    /// Display name captured when the item was added
    pub name: String,
    /// Optional image URL captured when the item was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unit price captured when the item was added
    pub price: f64,
    /// Number of units, never zero for an item held in a cart
    pub quantity: u32,
    /// Selected customization options
    #[serde(default)]
    pub selected_customizations: Customizations,
    /// Free-text instructions for the kitchen
    #[serde(default)]
    pub special_instructions: String,
    /// Derived `quantity * price`; `null` is read as 0 and recomputed on load
    #[serde(default, deserialize_with = "total_format::deserialize")]
    pub item_total: f64,
}

impl CartLineItem {
    /// Sets the quantity and recomputes the item total
    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.recompute_total();
    }

    /// Recomputes `item_total` from `quantity` and `price`
    pub fn recompute_total(&mut self) {
        self.item_total = line_total(self.quantity, self.price);
    }

    /// Returns true if the stored total matches `quantity * price`
    pub fn is_consistent(&self) -> bool {
        self.item_total == line_total(self.quantity, self.price)
    }
}

/// Total for `quantity` units at `price`
pub fn line_total(quantity: u32, price: f64) -> f64 {
    f64::from(quantity) * price
}

/// Line total, or `None` if it does not fit a finite `f64`
pub fn checked_line_total(quantity: u32, price: f64) -> Option<f64> {
    Some(line_total(quantity, price)).filter(|total| total.is_finite())
}

/// Non-finite totals are written as `null` by serde_json.
mod total_format {
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
    }
}

/// Identifiers are strings, but older snapshots may carry numeric ids.
mod id_format {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    impl From<RawId> for String {
        fn from(raw: RawId) -> Self {
            match raw {
                RawId::Text(s) => s,
                RawId::Number(n) => n.to_string(),
            }
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawId::deserialize(deserializer).map(String::from)
    }

    pub(super) fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pizza() -> CartLineItem {
        CartLineItem {
            menu_item_id: "m1".to_string(),
            restaurant_id: Some("r1".to_string()),
            name: "Pizza".to_string(),
            image: None,
            price: 200.0,
            quantity: 1,
            selected_customizations: Customizations::new(),
            special_instructions: String::new(),
            item_total: 200.0,
        }
    }

    #[test]
    fn test_set_quantity_recomputes_total() {
        let mut item = pizza();
        item.set_quantity(3);

        assert_eq!(item.quantity, 3);
        assert_eq!(item.item_total, 600.0);
        assert!(item.is_consistent());
    }

    #[test]
    fn test_snapshot_field_names() {
        let value = serde_json::to_value(pizza()).unwrap();

        assert_eq!(value["menuItemId"], "m1");
        assert_eq!(value["restaurantId"], "r1");
        assert_eq!(value["itemTotal"], 200.0);
        assert_eq!(value["selectedCustomizations"], json!({}));
        assert_eq!(value["specialInstructions"], "");
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_numeric_ids_are_read_as_strings() {
        let item: CartLineItem = serde_json::from_value(json!({
            "menuItemId": 7,
            "restaurantId": 3,
            "name": "Dosa",
            "price": 120,
            "quantity": 2,
            "itemTotal": 240
        }))
        .unwrap();

        assert_eq!(item.menu_item_id, "7");
        assert_eq!(item.restaurant_id.as_deref(), Some("3"));
        assert_eq!(item.item_total, 240.0);
        assert!(item.selected_customizations.is_empty());
    }

    #[test]
    fn test_null_item_total_reads_as_zero() {
        let item: CartLineItem = serde_json::from_value(json!({
            "menuItemId": "m1",
            "name": "Pizza",
            "price": 200,
            "quantity": 2,
            "itemTotal": null
        }))
        .unwrap();

        assert_eq!(item.item_total, 0.0);
        assert!(!item.is_consistent());
    }

    #[test]
    fn test_checked_line_total() {
        assert_eq!(checked_line_total(3, 200.0), Some(600.0));
        assert_eq!(checked_line_total(2, 1e308), None);
    }
}
