//! Bulk maintenance operation names, lock constants, and the purge
//! confirmation rule.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Operation names
// ---------------------------------------------------------------------------

/// Rewrite drifted category spellings to their canonical name.
pub const OP_NORMALIZE_CATEGORIES: &str = "normalize_categories";
/// Literal category rename.
pub const OP_RENAME_CATEGORY: &str = "rename_category";
/// Bulk price overwrite.
pub const OP_SET_PRICE: &str = "set_price";
/// Delete all shopper accounts, carts, and orders.
pub const OP_PURGE_ACCOUNTS: &str = "purge_accounts";

/// All valid operation names.
pub const VALID_OPERATIONS: &[&str] = &[
    OP_NORMALIZE_CATEGORIES,
    OP_RENAME_CATEGORY,
    OP_SET_PRICE,
    OP_PURGE_ACCOUNTS,
];

/// Bulk maintenance operation recorded in the maintenance log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceOperation {
    NormalizeCategories,
    RenameCategory,
    SetPrice,
    PurgeAccounts,
}

impl MaintenanceOperation {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalizeCategories => OP_NORMALIZE_CATEGORIES,
            Self::RenameCategory => OP_RENAME_CATEGORY,
            Self::SetPrice => OP_SET_PRICE,
            Self::PurgeAccounts => OP_PURGE_ACCOUNTS,
        }
    }

    /// Parse from a string, returning an error for unknown operations.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            OP_NORMALIZE_CATEGORIES => Ok(Self::NormalizeCategories),
            OP_RENAME_CATEGORY => Ok(Self::RenameCategory),
            OP_SET_PRICE => Ok(Self::SetPrice),
            OP_PURGE_ACCOUNTS => Ok(Self::PurgeAccounts),
            other => Err(CoreError::Validation(format!(
                "Unknown maintenance operation: '{other}'. Valid operations: {}",
                VALID_OPERATIONS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Advisory lock
// ---------------------------------------------------------------------------

/// PostgreSQL advisory lock ID for bulk maintenance writes.
/// Only one bulk write can run at a time.
pub const MAINTENANCE_LOCK_ID: i64 = 731_402_955;

// ---------------------------------------------------------------------------
// Purge
// ---------------------------------------------------------------------------

/// Shopper tables removed by the account purge, leaves first so foreign
/// keys are never violated.
pub const PURGE_ORDER: &[&str] = &["order_items", "orders", "cart_items", "carts", "users"];

/// What the caller asked for when running a destructive operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeDecision {
    /// Only report what would be deleted.
    Preview,
    /// Delete.
    Execute,
}

/// Decide whether a destructive operation may proceed.
///
/// `--dry-run` always wins. Without it, the operator must pass `--yes`.
pub fn purge_decision(dry_run: bool, confirmed: bool) -> Result<PurgeDecision, CoreError> {
    match (dry_run, confirmed) {
        (true, _) => Ok(PurgeDecision::Preview),
        (false, true) => Ok(PurgeDecision::Execute),
        (false, false) => Err(CoreError::ConfirmationRequired(
            "Refusing to delete without confirmation; re-run with --yes".to_string(),
        )),
    }
}
