// findash-widgets/src/settings.rs
use findash_core::{ConfigBag, ConfigStore, ConfigValue};

use crate::catalog::ids;
use crate::{BillsSettings, SpendingSettings, SummarySettings, TransactionsSettings};

/// Typed view over one widget's config bag.
///
/// Missing or mistyped keys fall back to the widget's defaults, so a stale or
/// hand-edited bag never stops the widget from rendering.
pub trait WidgetSettings: Sized + Default {
    const WIDGET_ID: &'static str;

    fn from_bag(bag: &ConfigBag) -> Self;

    fn to_bag(&self) -> ConfigBag;

    fn load(store: &ConfigStore) -> Self {
        Self::from_bag(&store.get(Self::WIDGET_ID))
    }

    /// Merge every field into the store's bag for this widget
    fn save(&self, store: &mut ConfigStore) {
        store.update(Self::WIDGET_ID, self.to_bag());
    }
}

/// The bag as the widget reads it: every typed field with defaults applied.
///
/// `None` for widgets without a typed view; their bags stay opaque.
pub fn typed_bag(id: &str, bag: &ConfigBag) -> Option<ConfigBag> {
    fn normalize<S: WidgetSettings>(bag: &ConfigBag) -> ConfigBag {
        S::from_bag(bag).to_bag()
    }

    let typed = match id {
        ids::SUMMARY => normalize::<SummarySettings>(bag),
        ids::BILLS => normalize::<BillsSettings>(bag),
        ids::RECENT_TRANSACTIONS => normalize::<TransactionsSettings>(bag),
        ids::SPENDING => normalize::<SpendingSettings>(bag),
        _ => return None,
    };
    Some(typed)
}

/// Check one value against the widget's typed view before it is stored.
///
/// Keys the view does not know are accepted as-is. On rejection the value the
/// widget would use instead is returned.
pub fn check_value(id: &str, key: &str, value: &ConfigValue) -> Result<(), ConfigValue> {
    let mut single = ConfigBag::new();
    single.insert(key.to_string(), value.clone());

    match typed_bag(id, &single).and_then(|typed| typed.get(key).cloned()) {
        Some(used) if used != *value => Err(used),
        _ => Ok(()),
    }
}

pub(crate) fn bool_or(bag: &ConfigBag, key: &str, default: bool) -> bool {
    bag.get(key).and_then(ConfigValue::as_bool).unwrap_or(default)
}

pub(crate) fn text_or(bag: &ConfigBag, key: &str, default: &str) -> String {
    bag.get(key)
        .and_then(ConfigValue::as_str)
        .unwrap_or(default)
        .to_string()
}

/// Non-negative whole number clamped to `max`
pub(crate) fn count_or(bag: &ConfigBag, key: &str, default: u32, max: u32) -> u32 {
    match bag.get(key).and_then(ConfigValue::as_number) {
        Some(n) if n.is_finite() && n >= 0.0 => (n.trunc() as u32).min(max),
        Some(n) => {
            tracing::debug!(key, value = n, "ignoring out-of-range setting");
            default
        }
        None => default,
    }
}
