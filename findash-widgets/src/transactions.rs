// findash-widgets/src/transactions.rs
use findash_core::{ConfigBag, config_bag};

use crate::catalog::ids;
use crate::settings::{WidgetSettings, bool_or, count_or};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionsSettings {
    pub limit: u32,
    pub show_pending: bool,
}

impl Default for TransactionsSettings {
    fn default() -> Self {
        Self {
            limit: 10,
            show_pending: true,
        }
    }
}

impl WidgetSettings for TransactionsSettings {
    const WIDGET_ID: &'static str = ids::RECENT_TRANSACTIONS;

    fn from_bag(bag: &ConfigBag) -> Self {
        let defaults = Self::default();
        Self {
            limit: count_or(bag, "limit", defaults.limit, 100).max(1),
            show_pending: bool_or(bag, "showPending", defaults.show_pending),
        }
    }

    fn to_bag(&self) -> ConfigBag {
        config_bag! {
            "limit" => self.limit,
            "showPending" => self.show_pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_shows_one_row() {
        let settings = TransactionsSettings::from_bag(&config_bag! { "limit" => 0u32 });
        assert_eq!(settings.limit, 1);
        assert!(settings.show_pending);
    }
}
