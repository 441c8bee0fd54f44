// findash-widgets/src/catalog.rs
use findash_core::{Catalog, CatalogBuilder, CatalogError, register_widget};

/// Stable ids of the built-in widgets. Persisted layouts and configs refer to these.
pub mod ids {
    pub const SUMMARY: &str = "summary";
    pub const BANK_ACCOUNTS: &str = "bank-accounts";
    pub const RECENT_TRANSACTIONS: &str = "recent-transactions";
    pub const SPENDING: &str = "spending";
    pub const CALENDAR: &str = "calendar";
    pub const BILLS: &str = "bills";
    pub const BUDGET: &str = "budget";
    pub const NET_WORTH: &str = "net-worth";
    pub const HOME_STATUS: &str = "home-status";
}

/// Widgets shipped with the dashboard, in their default order
pub fn builtin_catalog() -> Result<Catalog, CatalogError> {
    let mut builder = CatalogBuilder::new();

    register_widget!(builder, ids::SUMMARY, "Summary", "2x1", ["1x1", "2x1"]);
    register_widget!(builder, ids::BANK_ACCOUNTS, "Bank Accounts", "1x1", ["1x1", "1x2"]);
    register_widget!(
        builder,
        ids::RECENT_TRANSACTIONS,
        "Recent Transactions",
        "2x1",
        ["2x1", "2x2"]
    );
    register_widget!(builder, ids::SPENDING, "Spending", "2x1", ["1x1", "2x1", "2x2"]);
    register_widget!(builder, ids::CALENDAR, "Calendar", "1x1", ["1x1"]);
    register_widget!(builder, ids::BILLS, "Upcoming Bills", "1x1", ["1x1", "2x1"]);
    register_widget!(builder, ids::BUDGET, "Budget", "1x1", ["1x1", "2x1"], disabled);
    register_widget!(builder, ids::NET_WORTH, "Net Worth", "1x1", ["1x1"], disabled);
    register_widget!(builder, ids::HOME_STATUS, "Home", "1x1", ["1x1", "1x2"], disabled);

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.ids().next(), Some(ids::SUMMARY));
    }

    #[test]
    fn test_builtin_sizes_have_grid_dimensions() {
        let catalog = builtin_catalog().unwrap();
        for definition in &catalog {
            for size in &definition.available_sizes {
                assert!(
                    size.dimensions().is_some(),
                    "{} has non-grid size {}",
                    definition.id,
                    size
                );
            }
        }
    }

    #[test]
    fn test_optional_widgets_start_hidden() {
        let catalog = builtin_catalog().unwrap();
        let hidden: Vec<_> = catalog
            .iter()
            .filter(|d| !d.default_enabled)
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(hidden, vec![ids::BUDGET, ids::NET_WORTH, ids::HOME_STATUS]);
    }
}
