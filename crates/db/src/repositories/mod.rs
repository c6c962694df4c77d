//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod account_repo;
pub mod maintenance_log_repo;
pub mod product_repo;

pub use account_repo::AccountRepo;
pub use maintenance_log_repo::MaintenanceLogRepo;
pub use product_repo::ProductRepo;
