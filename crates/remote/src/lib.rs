//! HTTP clients used by the maintenance toolkit.
//!
//! - [`image_host`]: image-hosting admin API (folder listings).
//! - [`storefront`]: the shop's own product listing API.

pub mod image_host;
pub mod storefront;
