pub mod bills;
pub mod catalog;
pub mod settings;
pub mod spending;
pub mod summary;
pub mod transactions;

pub use bills::BillsSettings;
pub use catalog::{builtin_catalog, ids};
pub use findash_core::{Catalog, ConfigBag, ConfigStore, ConfigValue};
pub use settings::{WidgetSettings, check_value, typed_bag};
pub use spending::{ChartKind, SpendingSettings};
pub use summary::SummarySettings;
pub use transactions::TransactionsSettings;
