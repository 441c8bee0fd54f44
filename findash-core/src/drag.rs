// findash-core/src/drag.rs
use crate::{DashboardEvent, EventBus, Reorder};

/// Lifecycle of a reorder gesture
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Widget currently lifted; advisory for the host's visual feedback
    Dragging(String),
}

/// Turns drag-start / drag-end gestures into a single reorder on drop.
///
/// Nothing touches the layout until the gesture ends, so cancelling needs no rollback.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    bus: Option<EventBus>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Lift `id`. Starting a new gesture mid-drag abandons the previous one.
    pub fn begin(&mut self, id: impl Into<String>) {
        let id = id.into();
        tracing::debug!(widget_id = %id, "drag started");
        self.publish(DashboardEvent::DragStarted {
            widget_id: id.clone(),
        });
        self.state = DragState::Dragging(id);
    }

    /// Finish the gesture over `over`; reorders only when dropped on a different widget.
    ///
    /// Returns whether the layout changed.
    pub fn end<R>(&mut self, over: Option<&str>, layout: &mut R) -> bool
    where
        R: Reorder + ?Sized,
    {
        let DragState::Dragging(active) = std::mem::take(&mut self.state) else {
            return false;
        };

        let reordered = match over {
            Some(target) if target != active => layout.reorder(&active, target),
            _ => false,
        };

        tracing::debug!(widget_id = %active, over = ?over, reordered, "drag ended");
        self.publish(DashboardEvent::DragEnded {
            widget_id: active,
            over: over.map(str::to_string),
            reordered,
        });
        reordered
    }

    /// Abort the gesture without touching the layout
    pub fn cancel(&mut self) {
        if let DragState::Dragging(active) = std::mem::take(&mut self.state) {
            tracing::debug!(widget_id = %active, "drag cancelled");
            self.publish(DashboardEvent::DragEnded {
                widget_id: active,
                over: None,
                reordered: false,
            });
        }
    }

    fn publish(&self, event: DashboardEvent) {
        if let Some(bus) = &self.bus {
            bus.publish(event);
        }
    }
}
