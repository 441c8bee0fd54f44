// findash-cli/src/app.rs
use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use findash_core::{Dashboard, DashboardEvent, EventReceiver, Subscription};
use ratatui::layout::{Position, Rect};

/// Whether the event loop keeps running after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Widget Host state: the session plus what the terminal needs for hit-testing
pub struct App {
    dashboard: Dashboard,
    selected: usize,
    status: String,
    /// Screen areas from the last frame, used to resolve drop targets
    pub(crate) list_area: Rect,
    pub(crate) card_areas: Vec<(String, Rect)>,
    events: EventReceiver,
    _subscription: Subscription,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (subscription, events) = dashboard.events().subscribe("*");
        Self {
            dashboard,
            selected: 0,
            status: String::from("Ready"),
            list_area: Rect::default(),
            card_areas: Vec::new(),
            events,
            _subscription: subscription,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn into_dashboard(self) -> Dashboard {
        self.dashboard
    }

    fn selected_id(&self) -> Option<String> {
        self.dashboard
            .layout()
            .instances()
            .get(self.selected)
            .map(|w| w.id.clone())
    }

    fn select(&mut self, index: usize) {
        let len = self.dashboard.layout().instances().len();
        self.selected = index.min(len.saturating_sub(1));
    }

    /// Fold pending change notifications into the status line
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(text) = describe(&event) {
                self.status = text;
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.code == KeyCode::Char('r') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.dashboard.reload();
            self.select(self.selected);
            self.status = String::from("Reloaded from storage");
            return Flow::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Esc if self.dashboard.drag().is_dragging() => self.dashboard.cancel_drag(),
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.dashboard.layout_mut().toggle(&id);
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_id() {
                    self.dashboard.layout_mut().resize(&id);
                }
            }
            KeyCode::Char('m') if !self.dashboard.drag().is_dragging() => {
                if let Some(id) = self.selected_id() {
                    self.dashboard.begin_drag(&id);
                }
            }
            KeyCode::Char('m') | KeyCode::Enter => self.drop_on(self.selected_id()),
            KeyCode::Char('x') => {
                self.dashboard.cancel_drag();
                self.dashboard.layout_mut().reset();
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    self.dashboard.config_mut().reset_one(&id);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Pointer gestures: press lifts, release drops on whatever is under the cursor
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let target = self.widget_at(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(id) = target {
                    self.follow(&id);
                    self.dashboard.begin_drag(&id);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(id) = target {
                    self.follow(&id);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drop_on(target),
            _ => {}
        }
    }

    fn drop_on(&mut self, over: Option<String>) {
        let active = self.dashboard.drag().active_id().map(str::to_string);
        if active.is_none() {
            return;
        }

        self.dashboard.end_drag(over.as_deref());
        if let Some(id) = active {
            self.follow(&id);
        }
    }

    fn follow(&mut self, id: &str) {
        if let Some(position) = self.dashboard.layout().position(id) {
            self.selected = position;
        }
    }

    fn widget_at(&self, column: u16, row: u16) -> Option<String> {
        let point = Position::new(column, row);

        let inner = Rect {
            x: self.list_area.x + 1,
            y: self.list_area.y + 1,
            width: self.list_area.width.saturating_sub(2),
            height: self.list_area.height.saturating_sub(2),
        };
        if inner.contains(point) {
            let index = usize::from(row - inner.y);
            return self
                .dashboard
                .layout()
                .instances()
                .get(index)
                .map(|w| w.id.clone());
        }

        self.card_areas
            .iter()
            .find(|(_, area)| area.contains(point))
            .map(|(id, _)| id.clone())
    }
}

fn describe(event: &DashboardEvent) -> Option<String> {
    let text = match event {
        DashboardEvent::WidgetToggled { widget_id, enabled } => {
            format!("{widget_id} {}", if *enabled { "shown" } else { "hidden" })
        }
        DashboardEvent::WidgetResized { widget_id, size } => format!("{widget_id} resized to {size}"),
        DashboardEvent::WidgetMoved { widget_id, position } => {
            format!("{widget_id} moved to position {}", position + 1)
        }
        DashboardEvent::LayoutReset => String::from("Layout reset to defaults"),
        DashboardEvent::ConfigReset { widget_id: Some(id) } => format!("{id} settings cleared"),
        DashboardEvent::ConfigReset { widget_id: None } => String::from("All settings cleared"),
        DashboardEvent::DragStarted { widget_id } => {
            format!("Moving {widget_id}: choose a target and press Enter, Esc to cancel")
        }
        DashboardEvent::DragEnded {
            widget_id,
            reordered: false,
            ..
        } => format!("{widget_id} left in place"),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use findash_core::MemoryStorage;
    use findash_widgets::{builtin_catalog, ids};
    use std::sync::Arc;

    fn app() -> App {
        let dashboard = Dashboard::load(builtin_catalog().unwrap(), Arc::new(MemoryStorage::new()));
        App::new(dashboard)
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn order(app: &App) -> Vec<&str> {
        app.dashboard()
            .layout()
            .instances()
            .iter()
            .map(|w| w.id.as_str())
            .collect()
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_keyboard_drag_moves_widget() {
        let mut app = app();

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.dashboard().drag().active_id(), Some(ids::SUMMARY));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert_eq!(&order(&app)[..3], &[ids::BANK_ACCOUNTS, ids::RECENT_TRANSACTIONS, ids::SUMMARY]);
        assert_eq!(app.selected(), 2);
        assert!(!app.dashboard().drag().is_dragging());
    }

    #[test]
    fn test_escape_cancels_drag_before_quitting() {
        let mut app = app();
        let before: Vec<String> = order(&app).iter().map(|s| s.to_string()).collect();

        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Down);
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Continue);
        assert_eq!(order(&app), before);

        app.drain_events();
        assert_eq!(app.status(), "summary left in place");
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Quit);
    }

    #[test]
    fn test_toggle_and_resize_selected() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('s'));

        let summary = app.dashboard().layout().get(ids::SUMMARY).unwrap();
        assert!(!summary.enabled);
        assert_eq!(summary.current_size, "1x1");

        app.drain_events();
        assert_eq!(app.status(), "summary resized to 1x1");
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
        for _ in 0..20 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.selected(), 8);
    }

    #[test]
    fn test_mouse_drag_between_list_rows() {
        let mut app = app();
        app.list_area = Rect::new(0, 0, 30, 12);

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 1));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 3, 4));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 3, 4));

        assert_eq!(order(&app)[3], ids::SUMMARY);
        assert_eq!(app.selected(), 3);
    }

    #[test]
    fn test_mouse_release_outside_targets_cancels() {
        let mut app = app();
        app.list_area = Rect::new(0, 0, 30, 12);
        app.card_areas = vec![(ids::CALENDAR.to_string(), Rect::new(40, 0, 20, 8))];
        let before: Vec<String> = order(&app).iter().map(|s| s.to_string()).collect();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 35, 20));
        assert_eq!(order(&app), before);
        assert!(!app.dashboard().drag().is_dragging());

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 3, 2));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 45, 3));
        assert_eq!(app.dashboard().layout().position(ids::BANK_ACCOUNTS), Some(4));
    }
}
