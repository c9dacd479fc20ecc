//! Cart state, persistence and checkout logic

pub mod cart;
pub mod checkout;
pub mod error;
pub mod notify;
pub mod order;
pub mod queue;
pub mod store;
pub mod types;
