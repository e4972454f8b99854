use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ecoleta_core::form::Request;
use ratatui::layout::Rect;

use crate::app::{App, Focus};
use crate::ui;

#[derive(Debug)]
pub(crate) enum Action {
    None,
    Quit,
    /// Hand the requests to the task runner.
    Spawn(Vec<Request>),
}

impl From<Option<Request>> for Action {
    fn from(request: Option<Request>) -> Self {
        request.map_or(Action::None, |request| Action::Spawn(vec![request]))
    }
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global shortcuts
    if ctrl && key.code == Char('c') {
        return Action::Quit;
    }

    // The notice blocks everything else until acknowledged
    if app.notice.is_some() {
        if matches!(key.code, Enter | Esc | Char(' ')) {
            app.notice = None;
            app.form.clear_error();
        }
        return Action::None;
    }

    if ctrl && key.code == Char('s') {
        return app.form.submit().into();
    }
    if ctrl && key.code == Char('r') {
        return Action::Spawn(app.form.reload());
    }

    match key.code {
        Tab => {
            app.focus = app.focus.next();
            return Action::None;
        }
        BackTab => {
            app.focus = app.focus.previous();
            return Action::None;
        }
        Esc => return Action::Quit,
        Char('q') if key.modifiers.is_empty() && !matches!(app.focus, Focus::Field(_)) => {
            return Action::Quit;
        }
        _ => {}
    }

    let mut action = Action::None;

    match app.focus {
        Focus::Field(field) => match key.code {
            Char(character) => {
                if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) {
                    app.form.field_mut(field).push(character);
                }
            }
            Backspace => {
                app.form.field_mut(field).pop();
            }
            Enter | Down => app.focus = app.focus.next(),
            Up => app.focus = app.focus.previous(),
            _ => {}
        },

        Focus::Map => match key.code {
            Up | Char('k') => app.map.pan(0, 1),
            Down | Char('j') => app.map.pan(0, -1),
            Left | Char('h') => app.map.pan(-1, 0),
            Right | Char('l') => app.map.pan(1, 0),
            Char('+' | '=') => app.map.zoom_in(),
            Char('-') => app.map.zoom_out(),
            Char('c') => app.recenter_map(),
            Enter | Char(' ') => {
                let center = app.map.center;
                app.pick_point(center);
            }
            _ => {}
        },

        Focus::Region => match key.code {
            Up | Char('k') => app.region_index = app.region_index.saturating_sub(1),
            Down | Char('j') => {
                if app.region_index + 1 < app.region_option_count() {
                    app.region_index += 1;
                }
            }
            Enter | Char(' ') => action = app.select_highlighted_region().into(),
            _ => {}
        },

        Focus::Locality => match key.code {
            Up | Char('k') => app.locality_index = app.locality_index.saturating_sub(1),
            Down | Char('j') => {
                if app.locality_index + 1 < app.locality_option_count() {
                    app.locality_index += 1;
                }
            }
            Enter | Char(' ') => app.select_highlighted_locality(),
            _ => {}
        },

        Focus::Items => match key.code {
            Up | Char('k') => app.item_index = app.item_index.saturating_sub(1),
            Down | Char('j') => {
                if app.item_index + 1 < app.form.items().len() {
                    app.item_index += 1;
                }
            }
            Enter | Char(' ') => app.toggle_highlighted_item(),
            _ => {}
        },

        Focus::Submit => {
            if matches!(key.code, Enter | Char(' ')) {
                action = app.form.submit().into();
            }
        }
    }
    action
}

/// A left click inside the map canvas picks the clicked coordinate.
pub(crate) fn handle_mouse_event(mouse: MouseEvent, app: &mut App, screen: Rect) -> Action {
    if app.notice.is_some() || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Action::None;
    }

    let canvas = ui::map_canvas_area(screen);
    if let Some(point) = app.map.coordinate_at(canvas, mouse.column, mouse.row) {
        app.pick_point(point);
    }
    Action::None
}
