use crate::app::App;
use crate::ui::{band_color, Panels};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const LON_BOUNDS: [f64; 2] = [-180.0, 180.0];
const LAT_BOUNDS: [f64; 2] = [-90.0, 90.0];

pub fn render_world_map(app: &App, f: &mut Frame<'_>, panels: &Panels) {
    let block = Block::default()
        .title("Latency Map")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, panels.map);

    let dashboard = &app.dashboard;
    let selected = dashboard.selected_marker().map(|marker| marker.code.as_str());

    let canvas = Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds(LON_BOUNDS)
        .y_bounds(LAT_BOUNDS)
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            for marker in dashboard.markers().iter() {
                let style = Style::default().fg(band_color(marker.band));
                let glyph = if selected == Some(marker.code.as_str()) {
                    Span::styled("◉", style.add_modifier(Modifier::BOLD))
                } else {
                    Span::styled("●", style)
                };
                ctx.print(marker.lon, marker.lat, glyph);
            }
        });
    f.render_widget(canvas, panels.map_canvas);

    let tooltip = dashboard.selected_marker().map_or_else(
        || {
            Text::from(TextLine::from(Span::styled(
                "Waiting for regions...",
                Style::default().fg(Color::Gray),
            )))
        },
        |marker| {
            Text::from(vec![
                TextLine::from(Span::styled(
                    marker.tooltip.title.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )),
                TextLine::from(Span::styled(
                    marker.tooltip.detail(),
                    Style::default().fg(band_color(marker.band)),
                )),
            ])
        },
    );
    f.render_widget(Paragraph::new(tooltip), panels.tooltip);
}

/// Longitude and latitude under the centre of a terminal cell of the map canvas.
pub fn cell_to_coordinates(canvas: Rect, column: u16, row: u16) -> Option<(f64, f64)> {
    if canvas.width == 0
        || canvas.height == 0
        || !canvas.contains(ratatui::layout::Position::new(column, row))
    {
        return None;
    }

    let x = (f64::from(column - canvas.x) + 0.5) / f64::from(canvas.width);
    let y = (f64::from(row - canvas.y) + 0.5) / f64::from(canvas.height);

    let lon = x.mul_add(LON_BOUNDS[1] - LON_BOUNDS[0], LON_BOUNDS[0]);
    let lat = y.mul_add(-(LAT_BOUNDS[1] - LAT_BOUNDS[0]), LAT_BOUNDS[1]);
    Some((lon, lat))
}

/// How far from a marker, in degrees, a click still counts as hitting it.
pub fn click_tolerance(canvas: Rect) -> f64 {
    let cell_lon = (LON_BOUNDS[1] - LON_BOUNDS[0]) / f64::from(canvas.width.max(1));
    let cell_lat = (LAT_BOUNDS[1] - LAT_BOUNDS[0]) / f64::from(canvas.height.max(1));
    cell_lon.max(cell_lat) * 1.5
}
