// findash-core/src/session.rs
use crate::{
    Catalog, ConfigStore, DragController, EventBus, KeyValueStorage, LayoutStore, StorageSettings,
};
use std::sync::Arc;

/// Storage keys for the two persisted blobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub layout: String,
    pub config: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            layout: LayoutStore::DEFAULT_KEY.to_string(),
            config: ConfigStore::DEFAULT_KEY.to_string(),
        }
    }
}

impl From<&StorageSettings> for StorageKeys {
    fn from(settings: &StorageSettings) -> Self {
        Self {
            layout: settings.layout_key.clone(),
            config: settings.config_key.clone(),
        }
    }
}

/// Everything one dashboard session owns: layout, widget config and the drag gesture.
///
/// Created loaded; dropped or `dispose`d when the host tears the UI down.
pub struct Dashboard {
    catalog: Arc<Catalog>,
    layout: LayoutStore,
    config: ConfigStore,
    drag: DragController,
    bus: EventBus,
}

impl Dashboard {
    pub fn load(catalog: impl Into<Arc<Catalog>>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::load_with_keys(catalog, storage, &StorageKeys::default())
    }

    pub fn load_with_keys(
        catalog: impl Into<Arc<Catalog>>,
        storage: Arc<dyn KeyValueStorage>,
        keys: &StorageKeys,
    ) -> Self {
        let catalog = catalog.into();
        let bus = EventBus::new();

        let layout = LayoutStore::new(catalog.clone(), storage.clone())
            .with_key(keys.layout.clone())
            .with_event_bus(bus.clone());
        let config = ConfigStore::new(storage)
            .with_key(keys.config.clone())
            .with_event_bus(bus.clone());
        let drag = DragController::new().with_event_bus(bus.clone());

        let mut dashboard = Self {
            catalog,
            layout,
            config,
            drag,
            bus,
        };
        dashboard.reload();
        dashboard
    }

    /// Re-read both blobs from storage, dropping any gesture in flight
    pub fn reload(&mut self) {
        self.drag.cancel();
        self.layout.load();
        self.config.load();
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutStore {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutStore {
        &mut self.layout
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConfigStore {
        &mut self.config
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn begin_drag(&mut self, id: &str) {
        self.drag.begin(id);
    }

    pub fn end_drag(&mut self, over: Option<&str>) -> bool {
        self.drag.end(over, &mut self.layout)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn dispose(mut self) {
        self.drag.cancel();
        tracing::debug!(
            layout_key = %self.layout.key(),
            config_key = %self.config.key(),
            "dashboard disposed"
        );
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("layout", &self.layout)
            .field("config", &self.config)
            .field("drag", &self.drag.state())
            .finish_non_exhaustive()
    }
}
