//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the projections and DTOs the repositories need.

pub mod account;
pub mod maintenance_log;
pub mod product;
