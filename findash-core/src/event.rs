// findash-core/src/event.rs
use crate::SizeToken;
use crossbeam::channel::{Receiver, Sender, unbounded};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

pub type EventReceiver = Receiver<DashboardEvent>;

/// Change notification published by the stores and the drag controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    LayoutLoaded,
    LayoutSaved,
    LayoutReset,
    WidgetToggled { widget_id: String, enabled: bool },
    WidgetResized { widget_id: String, size: SizeToken },
    WidgetMoved { widget_id: String, position: usize },
    ConfigLoaded,
    ConfigUpdated { widget_id: String },
    ConfigReset { widget_id: Option<String> },
    DragStarted { widget_id: String },
    DragEnded { widget_id: String, over: Option<String>, reordered: bool },
}

impl DashboardEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DashboardEvent::LayoutLoaded => "layout.loaded",
            DashboardEvent::LayoutSaved => "layout.saved",
            DashboardEvent::LayoutReset => "layout.reset",
            DashboardEvent::WidgetToggled { .. } => "layout.toggled",
            DashboardEvent::WidgetResized { .. } => "layout.resized",
            DashboardEvent::WidgetMoved { .. } => "layout.moved",
            DashboardEvent::ConfigLoaded => "config.loaded",
            DashboardEvent::ConfigUpdated { .. } => "config.updated",
            DashboardEvent::ConfigReset { .. } => "config.reset",
            DashboardEvent::DragStarted { .. } => "drag.started",
            DashboardEvent::DragEnded { .. } => "drag.ended",
        }
    }
}

/// Subscription handle - dropping this unsubscribes
pub struct Subscription {
    id: usize,
    bus: Arc<EventBusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

struct EventBusInner {
    subscriptions: RwLock<HashMap<usize, (String, Sender<DashboardEvent>)>>,
    next_id: AtomicUsize,
}

/// Topic-based pub/sub for dashboard changes. Clones share subscribers.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventBusInner {
                subscriptions: RwLock::new(HashMap::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    pub fn publish(&self, event: DashboardEvent) {
        let topic = event.topic();
        let subs = self
            .inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        for (pattern, tx) in subs.values() {
            if topic_matches(topic, pattern) {
                // A dropped receiver is not an error
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Subscribe to a topic pattern; a trailing `*` segment matches any suffix.
    pub fn subscribe(&self, pattern: impl Into<String>) -> (Subscription, EventReceiver) {
        let (tx, rx) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.inner
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (pattern.into(), tx));

        let sub = Subscription {
            id,
            bus: self.inner.clone(),
        };
        (sub, rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn topic_matches(topic: &str, pattern: &str) -> bool {
    let mut topic_parts = topic.split('.');
    let mut pattern_parts = pattern.split('.').peekable();

    while let Some(part) = pattern_parts.next() {
        if part == "*" && pattern_parts.peek().is_none() {
            return topic_parts.next().is_some();
        }
        match topic_parts.next() {
            Some(segment) if part == "*" || part == segment => {}
            _ => return false,
        }
    }

    topic_parts.next().is_none()
}
