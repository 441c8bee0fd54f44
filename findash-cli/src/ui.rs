// findash-cli/src/ui.rs
use findash_core::{ConfigBag, WidgetInstance};
use findash_widgets::typed_bag;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
};

use crate::app::App;

/// Card grid width in size-token columns (`2x1` spans the full width)
const GRID_COLUMNS: u16 = 2;
/// Terminal rows per size-token row
const ROW_HEIGHT: u16 = 8;
const LIST_WIDTH: u16 = 40;

const HELP: &str = " ↑↓ select  space show/hide  s size  m move  enter drop  c clear settings  x reset  ^r reload  q quit ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let [main, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());
    let [list_area, grid_area] =
        Layout::horizontal([Constraint::Length(LIST_WIDTH), Constraint::Min(0)]).areas(main);

    draw_list(frame, app, list_area);
    draw_cards(frame, app, grid_area);

    let status_line = Line::from(vec![
        Span::styled(format!(" {} ", app.status()), Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::styled(HELP, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), status);

    app.list_area = list_area;
}

fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = app.dashboard();
    let lifted = dashboard.drag().active_id();

    let items: Vec<ListItem> = dashboard
        .layout()
        .instances()
        .iter()
        .enumerate()
        .map(|(i, widget)| {
            let title = dashboard
                .catalog()
                .get(&widget.id)
                .map_or(widget.id.as_str(), |d| d.title.as_str());
            let marker = if lifted == Some(widget.id.as_str()) {
                "≡"
            } else if i == app.selected() {
                "›"
            } else {
                " "
            };
            let check = if widget.enabled { "[x]" } else { "[ ]" };

            let mut style = Style::default();
            if i == app.selected() {
                style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
            } else if !widget.enabled {
                style = style.fg(Color::DarkGray);
            }

            ListItem::new(Line::styled(
                format!("{marker}{check} {title:<26}{}", widget.current_size),
                style,
            ))
        })
        .collect();

    frame.render_widget(List::new(items).block(Block::bordered().title(" Widgets ")), area);
}

fn draw_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    let dashboard = app.dashboard();
    let selected_id = dashboard
        .layout()
        .instances()
        .get(app.selected())
        .map(|w| w.id.clone());
    let lifted = dashboard.drag().active_id();

    let enabled: Vec<&WidgetInstance> = dashboard.layout().enabled().collect();
    let placements = place_cards(&enabled, area);

    for (widget, card) in enabled.iter().zip(&placements) {
        let Some(card) = card else { continue };
        let title = dashboard
            .catalog()
            .get(&widget.id)
            .map_or(widget.id.as_str(), |d| d.title.as_str());

        let border = if lifted == Some(widget.id.as_str()) {
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else if selected_id.as_deref() == Some(widget.id.as_str()) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let bag = dashboard.config().get(&widget.id);
        let mut lines = vec![Line::styled(
            widget.current_size.to_string(),
            Style::default().fg(Color::DarkGray),
        )];
        lines.extend(settings_lines(&widget.id, &bag).into_iter().map(Line::from));

        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(format!(" {title} ")).border_style(border));
        frame.render_widget(body, *card);
    }

    let card_areas = enabled
        .iter()
        .zip(placements)
        .filter_map(|(widget, card)| card.map(|rect| (widget.id.clone(), rect)))
        .collect();
    app.card_areas = card_areas;
}

/// Card body text: effective typed settings first, then any other stored keys
fn settings_lines(id: &str, bag: &ConfigBag) -> Vec<String> {
    let typed = typed_bag(id, bag).unwrap_or_default();
    let extra = bag.iter().filter(|(key, _)| !typed.contains_key(*key));

    typed
        .iter()
        .chain(extra)
        .map(|(key, value)| format!("{key}: {value}"))
        .collect()
}

/// Shelf-pack cards left to right in layout order.
///
/// A card that does not fit the remaining columns starts a new shelf. Cards
/// below the visible area get `None`; cards cut by the bottom edge are clipped.
pub fn place_cards(widgets: &[&WidgetInstance], area: Rect) -> Vec<Option<Rect>> {
    let cell_width = area.width / GRID_COLUMNS;
    let mut column = 0u16;
    let mut shelf_top = 0u16;
    let mut shelf_rows = 0u16;

    widgets
        .iter()
        .map(|widget| {
            let (cols, rows) = widget.current_size.dimensions().unwrap_or((1, 1));
            let cols = cols.min(GRID_COLUMNS);

            if column + cols > GRID_COLUMNS {
                shelf_top += shelf_rows;
                column = 0;
                shelf_rows = 0;
            }

            let x = area.x + column * cell_width;
            let y = area.y.saturating_add(shelf_top.saturating_mul(ROW_HEIGHT));
            column += cols;
            shelf_rows = shelf_rows.max(rows);

            if y >= area.bottom() {
                return None;
            }
            Some(Rect {
                x,
                y,
                width: cols * cell_width,
                height: rows.saturating_mul(ROW_HEIGHT).min(area.bottom() - y),
            })
        })
        .collect()
}
