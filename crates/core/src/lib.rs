//! Pure domain logic for the poster catalog maintenance toolkit.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers call
//! into these modules to validate arguments and classify stored data.

pub mod category;
pub mod error;
pub mod images;
pub mod maintenance;
pub mod pricing;
pub mod search;
pub mod types;
