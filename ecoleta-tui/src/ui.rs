use ecoleta_core::{
    form::{Lookup, Notice},
    model::FormField,
};
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
        canvas::{Canvas, Map, MapResolution},
    },
};

use crate::app::{App, Focus};

/// Screen regions of the single-page form.
struct PageLayout {
    header: Rect,
    fields: [Rect; 3],
    region: Rect,
    locality: Rect,
    map: Rect,
    items: Rect,
    submit: Rect,
    status: Rect,
}

fn page_layout(area: Rect) -> PageLayout {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .margin(1)
    .areas(area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);

    let [name, email, whatsapp, region, locality] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Min(4),
    ])
    .areas(left);

    let [map, items, submit] = Layout::vertical([
        Constraint::Min(8),
        Constraint::Length(10),
        Constraint::Length(3),
    ])
    .areas(right);

    PageLayout {
        header,
        fields: [name, email, whatsapp],
        region,
        locality,
        map,
        items,
        submit,
        status,
    }
}

/// Inner area of the map block, where the canvas is drawn.
pub(crate) fn map_canvas_area(screen: Rect) -> Rect {
    page_layout(screen).map.inner(Margin::new(1, 1))
}

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let layout = page_layout(frame.area());

    let header = Paragraph::new("Register a collection point · Esc back to home")
        .block(Block::default().borders(Borders::ALL).title("Ecoleta"));
    frame.render_widget(header, layout.header);

    for (field, area) in FormField::ALL.into_iter().zip(layout.fields) {
        draw_field(frame, app, field, area);
    }
    draw_region_select(frame, app, layout.region);
    draw_locality_select(frame, app, layout.locality);
    draw_map(frame, app, layout.map);
    draw_items(frame, app, layout.items);
    draw_submit(frame, app, layout.submit);
    draw_status(frame, app, layout.status);

    if let Some(notice) = &app.notice {
        draw_notice(frame, notice);
    }
}

fn focus_block(app: &App, focus: Focus, title: String) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if app.focus == focus {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Entity name",
        FormField::Email => "Email",
        FormField::Whatsapp => "WhatsApp",
    }
}

fn draw_field(frame: &mut Frame<'_>, app: &App, field: FormField, area: Rect) {
    let focus = Focus::Field(field);
    let value = app.form.fields().get(field);
    let text = if app.focus == focus {
        format!("{value}▏")
    } else {
        value.to_owned()
    };

    let input = Paragraph::new(text).block(focus_block(app, focus, field_label(field).to_owned()));
    frame.render_widget(input, area);
}

fn lookup_suffix(lookup: &Lookup) -> &'static str {
    match lookup {
        Lookup::Loading => " · loading…",
        Lookup::Failed(_) => " · failed, Ctrl-R to retry",
        Lookup::Idle | Lookup::Ready => "",
    }
}

fn option_item(label: String, selected: bool) -> ListItem<'static> {
    if selected {
        ListItem::new(format!("● {label}")).style(Style::default().fg(Color::Green))
    } else {
        ListItem::new(format!("  {label}"))
    }
}

fn draw_region_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.form.selected_region();
    let items = app
        .form
        .region_options()
        .map(|option| match option {
            None => option_item("Select a state".to_owned(), selected.is_none()),
            Some(code) => option_item(code.to_string(), selected == Some(code)),
        })
        .collect::<Vec<ListItem<'_>>>();

    let title = format!("State (UF){}", lookup_suffix(app.form.regions_lookup()));
    let list = List::new(items)
        .block(focus_block(app, Focus::Region, title))
        .highlight_style(highlight_style());

    let mut state = ListState::default();
    state.select(Some(app.region_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_locality_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app.form.selected_locality();
    let items = app
        .form
        .locality_options()
        .map(|option| match option {
            None => option_item("Select a city".to_owned(), selected.is_none()),
            Some(name) => option_item(name.to_string(), selected == Some(name)),
        })
        .collect::<Vec<ListItem<'_>>>();

    let title = format!("City{}", lookup_suffix(app.form.localities_lookup()));
    let list = List::new(items)
        .block(focus_block(app, Focus::Locality, title))
        .highlight_style(highlight_style());

    let mut state = ListState::default();
    state.select(Some(app.locality_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_map(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selected = app
        .form
        .selected_point()
        .map_or_else(|| "no point selected".to_owned(), |point| point.to_string());
    let position = match app.form.position_lookup() {
        Lookup::Loading => " · locating…",
        Lookup::Failed(_) => " · position unknown",
        Lookup::Idle | Lookup::Ready => "",
    };
    let title = format!("Address: pick a point on the map ({selected}){position}");

    let (x_bounds, y_bounds) = app.map.bounds();
    let center = app.form.initial_center();
    let marker = app.form.selected_point();

    let canvas = Canvas::default()
        .block(
            focus_block(app, Focus::Map, title)
                .title_bottom(format!("zoom {} · + you · X point", app.map.zoom)),
        )
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::Green,
                resolution: MapResolution::High,
            });
            ctx.layer();
            if let Some(center) = center {
                ctx.print(
                    center.longitude,
                    center.latitude,
                    Span::styled("+", Style::default().fg(Color::Cyan)),
                );
            }
            if let Some(marker) = marker {
                ctx.print(
                    marker.longitude,
                    marker.latitude,
                    Span::styled(
                        "X",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn draw_items(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let selection = app.form.selected_items();
    let items = if app.form.items().is_empty() {
        vec![ListItem::new("No items loaded yet.")]
    } else {
        app.form
            .items()
            .iter()
            .map(|item| {
                if selection.contains(item.id) {
                    ListItem::new(format!("[x] {}", item.title))
                        .style(Style::default().fg(Color::Green))
                } else {
                    ListItem::new(format!("[ ] {}", item.title))
                }
            })
            .collect()
    };

    let title = format!(
        "Collection items ({} selected){}",
        selection.len(),
        lookup_suffix(app.form.items_lookup())
    );
    let mut block = focus_block(app, Focus::Items, title);
    if let Some(item) = app.form.items().get(app.item_index) {
        block = block.title_bottom(item.image_url.clone());
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style());

    let mut state = ListState::default();
    if !app.form.items().is_empty() {
        state.select(Some(app.item_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_submit(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (label, style) = if app.form.is_submitting() {
        ("Sending…", Style::default().fg(Color::DarkGray))
    } else if app.focus == Focus::Submit {
        ("[ Register ]", highlight_style())
    } else {
        ("[ Register ]", Style::default())
    };

    let button = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(focus_block(app, Focus::Submit, String::new()));
    frame.render_widget(button, area);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let nav_hint = match app.focus {
        Focus::Field(_) => "Type to edit · Tab next · Ctrl-S register · Esc/Ctrl-C quit",
        Focus::Map => {
            "←/↑/↓/→ pan · +/- zoom · c recenter · Enter or click pick point · Tab next · q quit"
        }
        Focus::Region | Focus::Locality => "↑/↓ move · Enter select · Tab next · q quit",
        Focus::Items => "↑/↓ move · Space toggle · Tab next · q quit",
        Focus::Submit => "Enter register · Ctrl-R reload failed lookups · q quit",
    };

    let status_text = if app.form.is_submitting() {
        format!("Registering… · {nav_hint}")
    } else if let Some(msg) = app.form.last_error() {
        format!("{msg} · {nav_hint}")
    } else if app.form.is_loading() {
        format!("Loading… · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.form.last_error().is_some() {
        Style::default().fg(Color::Red)
    } else if app.form.is_loading() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

fn draw_notice(frame: &mut Frame<'_>, notice: &Notice) {
    let (title, message, color) = match notice {
        Notice::Registered => ("Done", "Collection point registered.".to_owned(), Color::Green),
        Notice::SubmitFailed(reason) => ("Error", reason.clone(), Color::Red),
    };

    let area = centered(frame.area(), 50, 7);
    let popup = Paragraph::new(format!("{message}\n\nEnter to continue"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
