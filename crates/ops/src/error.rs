use catalog_core::error::CoreError;
use catalog_db::DbError;
use catalog_remote::image_host::ImageHostError;
use catalog_remote::storefront::StorefrontError;

use crate::config::ConfigError;

/// Top-level error for `catalog-ops` subcommands.
///
/// Wraps the error of every layer and maps each class to a process exit
/// status through [`CliError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The command line did not parse.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bulk write failed or could not take the maintenance lock.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A read query failed.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    ImageHost(#[from] ImageHostError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    /// Failed to render a report as JSON.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    /// The storefront filter returned products from other categories.
    #[error("Category filter check failed: {mismatched} product(s) outside the requested category")]
    CheckFailed { mismatched: usize },
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) => 3,
            CliError::Config(_) => 2,

            CliError::Core(core) => match core {
                CoreError::NotFound { .. } | CoreError::Validation(_) => 3,
                CoreError::ConfirmationRequired(_) => 5,
            },

            CliError::Db(DbError::LockHeld { .. }) => 4,
            CliError::Db(DbError::Sqlx(_)) | CliError::Sqlx(_) | CliError::Migrate(_) => 10,

            CliError::ImageHost(ImageHostError::InvalidFolder(_)) => 3,
            CliError::ImageHost(_) | CliError::Storefront(_) => 11,

            CliError::CheckFailed { .. } => 6,
            CliError::Output(_) => 1,
        }
    }
}
