// findash-widgets/src/summary.rs
use findash_core::{ConfigBag, config_bag};

use crate::catalog::ids;
use crate::settings::{WidgetSettings, bool_or, text_or};

/// Balance overview across all accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySettings {
    /// ISO 4217 code the totals are shown in
    pub currency: String,
    pub show_percentages: bool,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            show_percentages: true,
        }
    }
}

impl WidgetSettings for SummarySettings {
    const WIDGET_ID: &'static str = ids::SUMMARY;

    fn from_bag(bag: &ConfigBag) -> Self {
        let defaults = Self::default();
        Self {
            currency: text_or(bag, "currency", &defaults.currency),
            show_percentages: bool_or(bag, "showPercentages", defaults.show_percentages),
        }
    }

    fn to_bag(&self) -> ConfigBag {
        config_bag! {
            "currency" => self.currency.as_str(),
            "showPercentages" => self.show_percentages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findash_core::{ConfigStore, MemoryStorage};
    use std::sync::Arc;

    #[test]
    fn test_defaults_for_empty_bag() {
        assert_eq!(SummarySettings::from_bag(&ConfigBag::new()), SummarySettings::default());
    }

    #[test]
    fn test_reads_merged_partial_updates() {
        let mut store = ConfigStore::new(Arc::new(MemoryStorage::new()));
        store.load();
        store.update(ids::SUMMARY, config_bag! { "currency" => "EUR" });
        store.update(ids::SUMMARY, config_bag! { "showPercentages" => false });

        let settings = SummarySettings::load(&store);
        assert_eq!(settings.currency, "EUR");
        assert!(!settings.show_percentages);
    }

    #[test]
    fn test_save_keeps_unrelated_keys() {
        let mut store = ConfigStore::new(Arc::new(MemoryStorage::new()));
        store.update(ids::SUMMARY, config_bag! { "pinned" => true });

        SummarySettings::default().save(&mut store);
        assert_eq!(store.get(ids::SUMMARY).len(), 3);
        assert_eq!(SummarySettings::load(&store), SummarySettings::default());
    }
}
