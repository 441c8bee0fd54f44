// findash-widgets/src/bills.rs
use findash_core::{ConfigBag, config_bag};

use crate::catalog::ids;
use crate::settings::{WidgetSettings, bool_or, count_or};

const MAX_DAYS_AHEAD: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillsSettings {
    /// How far ahead upcoming bills are listed
    pub days_ahead: u32,
    pub show_paid: bool,
}

impl Default for BillsSettings {
    fn default() -> Self {
        Self {
            days_ahead: 30,
            show_paid: false,
        }
    }
}

impl WidgetSettings for BillsSettings {
    const WIDGET_ID: &'static str = ids::BILLS;

    fn from_bag(bag: &ConfigBag) -> Self {
        let defaults = Self::default();
        Self {
            days_ahead: count_or(bag, "daysAhead", defaults.days_ahead, MAX_DAYS_AHEAD),
            show_paid: bool_or(bag, "showPaid", defaults.show_paid),
        }
    }

    fn to_bag(&self) -> ConfigBag {
        config_bag! {
            "daysAhead" => self.days_ahead,
            "showPaid" => self.show_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_ahead_is_capped() {
        let settings = BillsSettings::from_bag(&config_bag! { "daysAhead" => 365u32 });
        assert_eq!(settings.days_ahead, MAX_DAYS_AHEAD);
        assert!(!settings.show_paid);
    }

    #[test]
    fn test_to_bag_round_trips() {
        let settings = BillsSettings {
            days_ahead: 14,
            show_paid: true,
        };
        assert_eq!(BillsSettings::from_bag(&settings.to_bag()), settings);
    }
}
