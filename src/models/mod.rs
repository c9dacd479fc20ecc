mod cart_item;
mod new_cart_item;
mod notice;
mod order;

pub use cart_item::{checked_line_total, line_total, CartLineItem, Customizations};
pub use new_cart_item::NewCartItem;
pub use notice::{Notice, NoticeKind};
pub use order::{Order, OrderDraft, OrderDraftItem, ESTIMATED_DELIVERY_MINUTES};
