//! Command-line surface.

use catalog_core::error::CoreError;
use catalog_core::maintenance::MaintenanceOperation;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "catalog-ops",
    version,
    about = "Query, inspect, and patch the poster catalog"
)]
pub struct Cli {
    /// Print reports as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find products whose title contains TERM (case-insensitive).
    Search {
        term: String,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Show one product with its decoded images and tags.
    Show { id: i64 },

    /// Count products per category and flag drifted or unknown names.
    Categories,

    /// Rewrite drifted category spellings to their canonical name.
    NormalizeCategories {
        #[arg(long)]
        dry_run: bool,
    },

    /// Rewrite one exact category string to another.
    RenameCategory {
        #[arg(default_value = "Tv Shows")]
        from: String,
        #[arg(default_value = "TV Shows")]
        to: String,
        #[arg(long)]
        dry_run: bool,
    },

    /// Overwrite the price of every product, or of one category.
    SetPrice {
        #[arg(allow_negative_numbers = true)]
        price: f64,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that every product's images field is a JSON array of URLs.
    AuditImages {
        /// Also list products whose images are fine.
        #[arg(long)]
        show_valid: bool,
    },

    /// Delete all users, carts, and orders. Products are kept.
    PurgeAccounts {
        #[arg(long)]
        dry_run: bool,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },

    /// Image hosting admin API.
    #[command(subcommand)]
    ImageHost(ImageHostCommand),

    /// Storefront product API.
    #[command(subcommand)]
    Storefront(StorefrontCommand),

    /// List executed bulk writes, newest first.
    History {
        /// Only entries for this operation: normalize-categories,
        /// rename-category, set-price, or purge-accounts.
        #[arg(long, value_parser = parse_operation)]
        operation: Option<MaintenanceOperation>,
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Apply the schema migrations.
    Migrate,
}

#[derive(Debug, Subcommand)]
pub enum ImageHostCommand {
    /// List the images stored under FOLDER.
    List { folder: String },
}

#[derive(Debug, Subcommand)]
pub enum StorefrontCommand {
    /// Fetch product previews.
    Preview {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    /// Request the listing filtered by CATEGORY and verify every result
    /// belongs to it.
    Filter {
        category: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}

/// Accept an operation in subcommand form (`set-price`) or in the form the
/// maintenance log stores (`set_price`).
fn parse_operation(raw: &str) -> Result<MaintenanceOperation, CoreError> {
    MaintenanceOperation::parse(&raw.trim().replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("catalog-ops").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_with_limit() {
        let cli = parse(&["search", "breaking bad", "--limit", "5"]);
        assert_matches!(
            cli.command,
            Command::Search { term, limit: Some(5) } if term == "breaking bad"
        );
        assert!(!cli.json);
    }

    #[test]
    fn json_flag_is_global() {
        let cli = parse(&["categories", "--json"]);
        assert!(cli.json);
        assert_matches!(cli.command, Command::Categories);
    }

    #[test]
    fn rename_defaults_to_tv_shows_fix() {
        let cli = parse(&["rename-category", "--dry-run"]);
        assert_matches!(
            cli.command,
            Command::RenameCategory { from, to, dry_run: true }
                if from == "Tv Shows" && to == "TV Shows"
        );
    }

    #[test]
    fn set_price_accepts_negative_for_validation_downstream() {
        let cli = parse(&["set-price", "-5", "--category", "Movies"]);
        assert_matches!(
            cli.command,
            Command::SetPrice { price, category: Some(c), dry_run: false }
                if price == -5.0 && c == "Movies"
        );
    }

    #[test]
    fn purge_flags() {
        let cli = parse(&["purge-accounts", "--yes"]);
        assert_matches!(
            cli.command,
            Command::PurgeAccounts { dry_run: false, yes: true }
        );
    }

    #[test]
    fn nested_subcommands() {
        let cli = parse(&["image-host", "list", "posters/tv"]);
        assert_matches!(
            cli.command,
            Command::ImageHost(ImageHostCommand::List { folder }) if folder == "posters/tv"
        );

        let cli = parse(&["storefront", "preview"]);
        assert_matches!(
            cli.command,
            Command::Storefront(StorefrontCommand::Preview { limit: 10 })
        );

        let cli = parse(&["storefront", "filter", "TV Shows"]);
        assert_matches!(
            cli.command,
            Command::Storefront(StorefrontCommand::Filter { category, limit: None })
                if category == "TV Shows"
        );
    }

    #[test]
    fn history_filter() {
        let cli = parse(&["history", "--operation", "set_price", "--limit", "5"]);
        assert_matches!(
            cli.command,
            Command::History {
                operation: Some(MaintenanceOperation::SetPrice),
                limit: Some(5)
            }
        );

        let cli = parse(&["history", "--operation", "purge-accounts"]);
        assert_matches!(
            cli.command,
            Command::History {
                operation: Some(MaintenanceOperation::PurgeAccounts),
                limit: None
            }
        );

        assert!(Cli::try_parse_from(["catalog-ops", "history", "--operation", "drop-all"]).is_err());
    }

    #[test]
    fn missing_argument_is_rejected() {
        assert!(Cli::try_parse_from(["catalog-ops", "show"]).is_err());
        assert!(Cli::try_parse_from(["catalog-ops", "set-price", "abc"]).is_err());
    }
}
