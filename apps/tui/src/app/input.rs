use crate::app::App;
use crate::ui;
use crate::ui::widgets::map::{cell_to_coordinates, click_tolerance};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use latency_core::Command;

/// Applies a key press; returns the command it triggers, if any.
pub fn handle_key(app: &mut App, key: KeyCode) -> Option<Command> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
            None
        }
        KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
            app.dashboard.select_next();
            None
        }
        KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
            app.dashboard.select_previous();
            None
        }
        KeyCode::Char('s') => {
            app.dashboard.toggle_sort();
            None
        }
        KeyCode::Enter => app
            .dashboard
            .selected_marker()
            .map(|marker| marker.on_click.clone()),
        _ => None,
    }
}

/// A left click on a marker selects it and fires its click command.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) -> Option<Command> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }

    let canvas = ui::panels(app.viewport).map_canvas;
    let (lon, lat) = cell_to_coordinates(canvas, mouse.column, mouse.row)?;
    let marker = app
        .dashboard
        .markers()
        .hit_test(lon, lat, click_tolerance(canvas))?;

    let code = marker.code.clone();
    let command = marker.on_click.clone();
    app.dashboard.select_code(&code);
    Some(command)
}
