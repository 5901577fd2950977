//! URL handling module for Shopmap
//!
//! This module provides host extraction, domain scope resolution, and
//! product-URL classification.

mod classify;
mod domain;

// Re-export main functions
pub use classify::is_product_url;
pub use domain::{host_of, is_valid_scheme, normalize_host, same_domain};
