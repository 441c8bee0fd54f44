pub mod catalog;
pub mod config;
pub mod drag;
pub mod event;
pub mod layout;
pub mod session;
pub mod settings;
pub mod storage;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, SizeToken, WidgetDefinition};
pub use config::{ConfigBag, ConfigStore, ConfigValue};
pub use drag::{DragController, DragState};
pub use event::{DashboardEvent, EventBus, EventReceiver, Subscription};
pub use layout::{LayoutStore, Reorder, WidgetInstance, default_layout, reconcile};
pub use session::{Dashboard, StorageKeys};
pub use settings::{LogSettings, Settings, SettingsError, StorageSettings};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError, validate_key};
