pub mod api;
pub mod config;
pub mod core;
pub mod models;

/// Re-export important types for easier access
pub use crate::models::{CartLineItem, NewCartItem, Notice, NoticeKind, Order, OrderDraft};

pub use crate::config::CartConfig;
pub use crate::core::cart::{Cart, CartEvent, CartTotals};
pub use crate::core::error::Error;
pub use crate::core::store::{CartStorage, FileBackend, MemoryBackend, StorageBackend};

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
