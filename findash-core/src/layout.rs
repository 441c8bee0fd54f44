// findash-core/src/layout.rs
use crate::{Catalog, DashboardEvent, EventBus, KeyValueStorage, SizeToken, WidgetDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Per-user customization of one catalog widget. Position is the index in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetInstance {
    pub id: String,
    pub enabled: bool,
    pub current_size: SizeToken,
}

impl WidgetInstance {
    pub fn from_definition(definition: &WidgetDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            enabled: definition.default_enabled,
            current_size: definition.default_size.clone(),
        }
    }
}

/// Catalog defaults in catalog order
pub fn default_layout(catalog: &Catalog) -> Vec<WidgetInstance> {
    catalog.iter().map(WidgetInstance::from_definition).collect()
}

/// Merge saved customization over the catalog.
///
/// Saved order is kept for ids the catalog still knows; the first saved entry
/// per id wins and later duplicates are dropped. Catalog ids missing from
/// `saved` are appended with defaults, in catalog order. A saved size the
/// definition no longer offers snaps back to the default size.
pub fn reconcile(catalog: &Catalog, saved: &[WidgetInstance]) -> Vec<WidgetInstance> {
    let mut seen = HashSet::with_capacity(catalog.len());
    let mut result = Vec::with_capacity(catalog.len());

    for entry in saved {
        let Some(definition) = catalog.get(&entry.id) else {
            tracing::debug!(widget_id = %entry.id, "dropping saved widget unknown to catalog");
            continue;
        };
        if !seen.insert(definition.id.as_str()) {
            continue;
        }

        let current_size = if definition.allows(&entry.current_size) {
            entry.current_size.clone()
        } else {
            tracing::debug!(
                widget_id = %entry.id,
                size = %entry.current_size,
                "saved size no longer offered, using default"
            );
            definition.default_size.clone()
        };

        result.push(WidgetInstance {
            id: definition.id.clone(),
            enabled: entry.enabled,
            current_size,
        });
    }

    for definition in catalog {
        if !seen.contains(definition.id.as_str()) {
            result.push(WidgetInstance::from_definition(definition));
        }
    }

    result
}

/// Anything that can move one widget onto another widget's position
pub trait Reorder {
    fn reorder(&mut self, from_id: &str, to_id: &str) -> bool;
}

/// Ordered widget instances, persisted whole after every mutation
pub struct LayoutStore {
    catalog: Arc<Catalog>,
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    instances: Vec<WidgetInstance>,
    bus: Option<EventBus>,
}

impl LayoutStore {
    pub const DEFAULT_KEY: &'static str = "dashboard-layout";

    /// Create a store holding catalog defaults; call `load` to apply saved state
    pub fn new(catalog: Arc<Catalog>, storage: Arc<dyn KeyValueStorage>) -> Self {
        let instances = default_layout(&catalog);
        Self {
            catalog,
            storage,
            key: Self::DEFAULT_KEY.to_string(),
            instances,
            bus: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn instances(&self) -> &[WidgetInstance] {
        &self.instances
    }

    pub fn get(&self, id: &str) -> Option<&WidgetInstance> {
        self.instances.iter().find(|w| w.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.instances.iter().position(|w| w.id == id)
    }

    /// Enabled widgets in rendering order
    pub fn enabled(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.instances.iter().filter(|w| w.enabled)
    }

    /// Replace current state with the reconciled persisted layout.
    ///
    /// Missing, unreadable or malformed data yields catalog defaults.
    pub fn load(&mut self) -> &[WidgetInstance] {
        self.instances = match self.read_saved() {
            Some(saved) => reconcile(&self.catalog, &saved),
            None => default_layout(&self.catalog),
        };
        tracing::debug!(key = %self.key, widgets = self.instances.len(), "layout loaded");
        self.publish(DashboardEvent::LayoutLoaded);
        &self.instances
    }

    /// Adopt a whole layout; it is reconciled first so unknown ids and sizes never stick
    pub fn save(&mut self, instances: &[WidgetInstance]) {
        self.instances = reconcile(&self.catalog, instances);
        self.persist();
        self.publish(DashboardEvent::LayoutSaved);
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(instance) = self.instances.iter_mut().find(|w| w.id == id) else {
            return false;
        };
        instance.enabled = !instance.enabled;
        let event = DashboardEvent::WidgetToggled {
            widget_id: instance.id.clone(),
            enabled: instance.enabled,
        };

        self.persist();
        self.publish(event);
        true
    }

    /// Step to the next size in the widget's cycle
    pub fn resize(&mut self, id: &str) -> bool {
        let Some(definition) = self.catalog.get(id) else {
            return false;
        };
        if definition.available_sizes.len() < 2 {
            return false;
        }
        let Some(instance) = self.instances.iter_mut().find(|w| w.id == id) else {
            return false;
        };

        instance.current_size = definition.next_size(&instance.current_size).clone();
        let event = DashboardEvent::WidgetResized {
            widget_id: instance.id.clone(),
            size: instance.current_size.clone(),
        };

        self.persist();
        self.publish(event);
        true
    }

    /// Move `from_id` to the index `to_id` holds, shifting the entries between them
    pub fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        if from_id == to_id {
            return false;
        }
        let (Some(from), Some(to)) = (self.position(from_id), self.position(to_id)) else {
            return false;
        };

        let moved = self.instances.remove(from);
        self.instances.insert(to, moved);

        self.persist();
        self.publish(DashboardEvent::WidgetMoved {
            widget_id: from_id.to_string(),
            position: to,
        });
        true
    }

    /// Restore catalog order and defaults, writing them out immediately
    pub fn reset(&mut self) {
        self.instances = default_layout(&self.catalog);
        self.persist();
        self.publish(DashboardEvent::LayoutReset);
    }

    fn read_saved(&self) -> Option<Vec<WidgetInstance>> {
        let raw = match self.storage.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "layout storage unavailable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(saved) => Some(saved),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding malformed layout");
                None
            }
        }
    }

    fn persist(&self) {
        let blob = match serde_json::to_string(&self.instances) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to serialize layout");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &blob) {
            tracing::warn!(key = %self.key, error = %e, "failed to persist layout");
        }
    }

    fn publish(&self, event: DashboardEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}

impl Reorder for LayoutStore {
    fn reorder(&mut self, from_id: &str, to_id: &str) -> bool {
        LayoutStore::reorder(self, from_id, to_id)
    }
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("key", &self.key)
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, StorageError};

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(vec![
                WidgetDefinition::new("calendar", "Calendar", "1x1"),
                WidgetDefinition::new("bills", "Bills", "1x1").with_sizes(["1x1", "2x1"]),
            ])
            .unwrap(),
        )
    }

    fn four_widgets() -> Arc<Catalog> {
        Arc::new(
            Catalog::new(
                ["a", "b", "c", "d"]
                    .into_iter()
                    .map(|id| WidgetDefinition::new(id, id.to_uppercase(), "1x1"))
                    .collect(),
            )
            .unwrap(),
        )
    }

    fn store(catalog: Arc<Catalog>) -> (LayoutStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        let mut store = LayoutStore::new(catalog, Arc::new(storage.clone()));
        store.load();
        (store, storage)
    }

    fn ids(store: &LayoutStore) -> Vec<&str> {
        store.instances().iter().map(|w| w.id.as_str()).collect()
    }

    fn instance(id: &str, enabled: bool, size: &str) -> WidgetInstance {
        WidgetInstance {
            id: id.to_string(),
            enabled,
            current_size: size.into(),
        }
    }

    #[test]
    fn test_fresh_load_uses_catalog_defaults() {
        let (store, storage) = store(catalog());

        assert_eq!(
            store.instances(),
            &[instance("calendar", true, "1x1"), instance("bills", true, "1x1")]
        );
        // Loading alone never writes
        assert!(!storage.contains(LayoutStore::DEFAULT_KEY));
    }

    #[test]
    fn test_load_is_idempotent() {
        let (mut store, _storage) = store(catalog());
        store.reorder("bills", "calendar");
        store.toggle("calendar");

        let first = store.load().to_vec();
        let second = store.load().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (mut store, _storage) = store(catalog());
        let state = vec![instance("bills", false, "2x1"), instance("calendar", true, "1x1")];

        store.save(&state);
        store.load();
        assert_eq!(store.instances(), state.as_slice());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let (mut store, _storage) = store(catalog());

        assert!(store.toggle("bills"));
        assert!(!store.get("bills").unwrap().enabled);
        assert!(store.toggle("bills"));
        assert!(store.get("bills").unwrap().enabled);
    }

    #[test]
    fn test_resize_cycles_through_sizes() {
        let (mut store, storage) = store(catalog());

        assert!(store.resize("bills"));
        assert_eq!(store.get("bills").unwrap().current_size, "2x1");
        assert!(store.resize("bills"));
        assert_eq!(store.get("bills").unwrap().current_size, "1x1");

        // Single-size widgets are left alone and nothing is written
        storage.remove(LayoutStore::DEFAULT_KEY);
        assert!(!store.resize("calendar"));
        assert!(!storage.contains(LayoutStore::DEFAULT_KEY));
        assert_eq!(store.get("calendar").unwrap().current_size, "1x1");
    }

    #[test]
    fn test_reorder_moves_onto_target_position() {
        let (mut store, _storage) = store(four_widgets());

        assert!(store.reorder("a", "c"));
        assert_eq!(ids(&store), vec!["b", "c", "a", "d"]);

        assert!(store.reorder("d", "b"));
        assert_eq!(ids(&store), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn test_reorder_is_not_self_inverse() {
        let (mut store, _storage) = store(four_widgets());

        store.reorder("a", "c");
        store.reorder("c", "a");
        assert_eq!(ids(&store), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut store, storage) = store(four_widgets());
        store.toggle("a");
        let before = storage.get(LayoutStore::DEFAULT_KEY).unwrap();
        let state = store.instances().to_vec();

        assert!(!store.toggle("nonexistent"));
        assert!(!store.resize("nonexistent"));
        assert!(!store.reorder("a", "nonexistent"));
        assert!(!store.reorder("a", "a"));

        assert_eq!(store.instances(), state.as_slice());
        assert_eq!(storage.get(LayoutStore::DEFAULT_KEY).unwrap(), before);
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let (mut store, storage) = store(four_widgets());
        store.reorder("d", "a");

        let mut fresh = LayoutStore::new(four_widgets(), Arc::new(storage.clone()));
        fresh.load();
        assert_eq!(ids(&fresh), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_reset_restores_defaults_and_persists() {
        let (mut store, storage) = store(catalog());
        store.reorder("bills", "calendar");
        store.resize("bills");
        store.toggle("calendar");

        store.reset();
        assert_eq!(store.instances(), default_layout(&catalog()).as_slice());

        let saved: Vec<WidgetInstance> =
            serde_json::from_str(&storage.get(LayoutStore::DEFAULT_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, default_layout(&catalog()));
    }

    #[test]
    fn test_load_drops_unknown_widgets() {
        let storage = MemoryStorage::new();
        storage
            .set(
                LayoutStore::DEFAULT_KEY,
                r#"[{"id":"old-widget","enabled":true,"currentSize":"1x1"},
                    {"id":"bills","enabled":false,"currentSize":"2x1"}]"#,
            )
            .unwrap();

        let mut store = LayoutStore::new(catalog(), Arc::new(storage));
        store.load();

        assert_eq!(ids(&store), vec!["bills", "calendar"]);
        assert!(store.get("old-widget").is_none());
        assert_eq!(store.get("bills").unwrap(), &instance("bills", false, "2x1"));
    }

    #[test]
    fn test_malformed_layout_falls_back_to_defaults() {
        for blob in [
            "not json",
            r#"{"id":"bills"}"#,
            r#"[{"id":"bills","enabled":false,"currentSize":"2x1"},{"id":"calendar"}]"#,
        ] {
            let storage = MemoryStorage::new();
            storage.set(LayoutStore::DEFAULT_KEY, blob).unwrap();

            let mut store = LayoutStore::new(catalog(), Arc::new(storage));
            store.load();
            assert_eq!(store.instances(), default_layout(&catalog()).as_slice(), "{blob}");
        }
    }

    #[test]
    fn test_reconcile_snaps_invalid_size_and_appends_new_ids() {
        let saved = vec![
            instance("bills", false, "3x3"),
            instance("bills", true, "2x1"),
        ];
        let result = reconcile(&catalog(), &saved);

        assert_eq!(
            result,
            vec![instance("bills", false, "1x1"), instance("calendar", true, "1x1")]
        );
    }

    #[test]
    fn test_reconcile_one_entry_per_definition() {
        let saved = vec![instance("ghost", true, "1x1")];
        let catalog = four_widgets();
        let result = reconcile(&catalog, &saved);

        assert_eq!(result.len(), catalog.len());
        let result_ids: Vec<_> = result.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(result_ids, catalog.ids().collect::<Vec<_>>());
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let json = serde_json::to_string(&instance("bills", true, "2x1")).unwrap();
        assert_eq!(json, r#"{"id":"bills","enabled":true,"currentSize":"2x1"}"#);
    }

    #[test]
    fn test_enabled_iterates_in_order() {
        let (mut store, _storage) = store(four_widgets());
        store.toggle("b");
        store.reorder("d", "a");

        let enabled: Vec<_> = store.enabled().map(|w| w.id.as_str()).collect();
        assert_eq!(enabled, vec!["d", "a", "c"]);
    }

    struct Unavailable;

    impl KeyValueStorage for Unavailable {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_unavailable_storage_degrades_to_defaults() {
        let mut store = LayoutStore::new(catalog(), Arc::new(Unavailable));
        store.load();
        assert_eq!(store.instances(), default_layout(&catalog()).as_slice());

        assert!(store.toggle("calendar"));
        assert!(store.resize("bills"));
        assert!(store.reorder("bills", "calendar"));
        assert_eq!(
            store.instances(),
            &[instance("bills", true, "2x1"), instance("calendar", false, "1x1")]
        );

        store.reset();
        assert_eq!(store.instances(), default_layout(&catalog()).as_slice());
    }
}
