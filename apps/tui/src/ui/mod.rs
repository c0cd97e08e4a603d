// UI module for the latency dashboard
// Layout is computed once per frame and shared with mouse handling

pub mod widgets;

use crate::app::App;
use latency_core::LatencyBand;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

/// Screen regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub header: Rect,
    pub map: Rect,
    /// Canvas inside the map block, where markers are plotted.
    pub map_canvas: Rect,
    pub tooltip: Rect,
    pub table: Rect,
    pub traceroute: Rect,
    pub error: Rect,
    pub help: Rect,
}

pub fn panels(area: Rect) -> Panels {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body[1]);

    let map_inner = Block::default().borders(Borders::ALL).inner(body[0]);
    let map_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(map_inner);

    Panels {
        header: rows[0],
        map: body[0],
        map_canvas: map_split[0],
        tooltip: map_split[1],
        table: side[0],
        traceroute: side[1],
        error: rows[2],
        help: rows[3],
    }
}

pub fn ui(app: &App, f: &mut Frame<'_>) {
    let panels = panels(f.area());

    widgets::status::render_header(app, f, panels.header);
    widgets::map::render_world_map(app, f, &panels);
    widgets::tables::render_latency_table(app, f, panels.table);
    widgets::traceroute::render_traceroute(app, f, panels.traceroute);
    widgets::status::render_error(app, f, panels.error);
    widgets::status::render_help(f, panels.help);
}

pub const fn band_color(band: LatencyBand) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}
