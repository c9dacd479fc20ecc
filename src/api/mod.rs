//! Entry points for storefront pages

pub mod checkout;
