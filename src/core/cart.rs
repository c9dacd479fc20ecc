//! Cart state container
//!
//! [`Cart`] is the only owner of the line items. Every mutation runs in three
//! steps: the item list is changed and totals recomputed, the snapshot is
//! persisted and published to watchers, then the resulting [`CartEvent`] is
//! turned into a notice for the registered sinks. Mutations never fail from
//! the caller's point of view; invalid input and storage problems are logged.

use crate::config::CartConfig;
use crate::core::notify::NotificationSink;
use crate::core::store::{CartStorage, FileBackend};
use crate::models::{checked_line_total, CartLineItem, NewCartItem, Notice};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Change committed by a cart operation
#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    /// A new line item was appended
    Added {
        menu_item_id: String,
        name: String,
        quantity: u32,
    },
    /// An existing line item received more units through `add_to_cart`
    QuantityIncreased {
        menu_item_id: String,
        name: String,
        quantity: u32,
    },
    /// A line item's quantity was set through `update_quantity`
    QuantitySet { menu_item_id: String, quantity: u32 },
    /// A line item was removed
    Removed { menu_item_id: String, name: String },
    /// Every line item was removed
    Cleared,
}

impl CartEvent {
    /// Notice shown to the shopper for this event, if any
    pub fn notice(&self) -> Option<Notice> {
        match self {
            CartEvent::Added { name, .. } => Some(Notice::success(format!("Added {name} to cart"))),
            CartEvent::QuantityIncreased { name, quantity, .. } => Some(Notice::success(format!(
                "Updated {name} quantity to {quantity}"
            ))),
            CartEvent::QuantitySet { .. } => None,
            CartEvent::Removed { name, .. } => {
                Some(Notice::info(format!("Removed {name} from cart")))
            }
            CartEvent::Cleared => Some(Notice::info("Cart cleared")),
        }
    }
}

/// Aggregate figures derived from the line items
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of quantities
    pub total_items: u64,
    /// Sum of line totals
    pub total_amount: f64,
}

/// Sole authority over the cart contents
pub struct Cart {
    items: Vec<CartLineItem>,
    storage: CartStorage,
    sinks: Vec<Box<dyn NotificationSink>>,
    snapshot_sender: watch::Sender<Vec<CartLineItem>>,
    last_save_ok: bool,
}

impl Cart {
    /// Creates a cart hydrated from `storage`
    pub fn new(storage: CartStorage) -> Self {
        let items = storage.load();
        log::debug!(
            "Cart {} hydrated with {} line items",
            storage.key(),
            items.len()
        );

        let (snapshot_sender, _) = watch::channel(items.clone());
        Self {
            items,
            storage,
            sinks: Vec::new(),
            snapshot_sender,
            last_save_ok: true,
        }
    }

    /// Creates a cart persisted to files as configured
    pub fn open(config: &CartConfig) -> Self {
        let backend = FileBackend::new(&config.storage_dir);
        Self::new(CartStorage::new(backend, config.storage_key.clone()))
    }

    /// Adds a notification sink
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.add_sink(sink);
        self
    }

    /// Registers a notification sink
    pub fn add_sink(&mut self, sink: impl NotificationSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Watches committed snapshots of the line items
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartLineItem>> {
        self.snapshot_sender.subscribe()
    }

    /// Adds an item, or more units of an item already in the cart
    ///
    /// Items missing an id, a name or a positive price are rejected without
    /// touching the cart, as are additions whose line total would overflow;
    /// the rejection is only logged.
    pub fn add_to_cart(&mut self, item: NewCartItem) -> Option<CartEvent> {
        if let Err(reason) = item.validate() {
            log::error!("Invalid item data ({}): {:?}", reason, item);
            return None;
        }

        let added = item.requested_quantity();
        let event = match self.position(&item.menu_item_id) {
            Some(index) => {
                let line = &mut self.items[index];
                let quantity = line.quantity.saturating_add(added);
                if checked_line_total(quantity, line.price).is_none() {
                    log::error!(
                        "Refusing to raise {} to {} units: line total overflows",
                        line.menu_item_id,
                        quantity
                    );
                    return None;
                }
                line.set_quantity(quantity);
                CartEvent::QuantityIncreased {
                    menu_item_id: item.menu_item_id,
                    name: item.name,
                    quantity,
                }
            }
            None => {
                let line = item.into_line_item();
                let event = CartEvent::Added {
                    menu_item_id: line.menu_item_id.clone(),
                    name: line.name.clone(),
                    quantity: line.quantity,
                };
                self.items.push(line);
                event
            }
        };

        self.commit(&event);
        Some(event)
    }

    /// Removes the line item with `menu_item_id`; absent ids are ignored
    pub fn remove_from_cart(&mut self, menu_item_id: &str) -> Option<CartEvent> {
        let index = self.position(menu_item_id)?;
        let removed = self.items.remove(index);

        let event = CartEvent::Removed {
            menu_item_id: removed.menu_item_id,
            name: removed.name,
        };
        self.commit(&event);
        Some(event)
    }

    /// Sets the quantity of a line item; zero or less removes it
    ///
    /// A quantity whose line total would overflow is refused and logged.
    pub fn update_quantity(&mut self, menu_item_id: &str, new_quantity: i64) -> Option<CartEvent> {
        if new_quantity <= 0 {
            return self.remove_from_cart(menu_item_id);
        }

        let index = self.position(menu_item_id)?;
        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        if checked_line_total(quantity, self.items[index].price).is_none() {
            log::error!(
                "Refusing to set {} to {} units: line total overflows",
                menu_item_id,
                quantity
            );
            return None;
        }
        self.items[index].set_quantity(quantity);

        let event = CartEvent::QuantitySet {
            menu_item_id: menu_item_id.to_string(),
            quantity,
        };
        self.commit(&event);
        Some(event)
    }

    /// Empties the cart
    pub fn clear_cart(&mut self) -> CartEvent {
        self.items.clear();

        let event = CartEvent::Cleared;
        self.commit(&event);
        event
    }

    /// Sum of line totals, 0 for an empty cart
    pub fn cart_total(&self) -> f64 {
        self.items.iter().map(|item| item.item_total).sum()
    }

    /// Sum of quantities, 0 for an empty cart
    pub fn cart_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Both aggregates at once
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            total_items: self.cart_item_count(),
            total_amount: self.cart_total(),
        }
    }

    /// Line items in insertion order
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Line item with `menu_item_id`
    pub fn get(&self, menu_item_id: &str) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.menu_item_id == menu_item_id)
    }

    /// Owned copy of the line items
    pub fn snapshot(&self) -> Vec<CartLineItem> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// False if the most recent snapshot could not be persisted
    pub fn is_persisted(&self) -> bool {
        self.last_save_ok
    }

    /// Sends a notice to every registered sink
    pub fn notify(&self, notice: &Notice) {
        for sink in &self.sinks {
            sink.notify(notice);
        }
    }

    fn position(&self, menu_item_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.menu_item_id == menu_item_id)
    }

    fn commit(&mut self, event: &CartEvent) {
        self.last_save_ok = self.storage.save(&self.items);
        self.snapshot_sender.send_replace(self.items.clone());

        if let Some(notice) = event.notice() {
            self.notify(&notice);
        }
    }
}
