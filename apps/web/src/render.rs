use latency_core::table::COLUMNS;
use latency_core::traceroute::{HOP_COLUMNS, NO_DATA_MESSAGE};
use latency_core::{Dashboard, LatencyBand, TraceroutePanel};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders, Cell, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

/// Draws the whole page: an outer frame around the dashboard panels.
pub fn draw(dashboard: &Dashboard, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("Region Latency")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 1));
    f.render_widget(block, area);

    render_dashboard(dashboard, f, inner);
}

fn render_dashboard(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(dashboard, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(main_layout[1]);

    render_map_panel(dashboard, f, content[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(content[1]);

    render_latency_table(dashboard, f, side[0]);
    render_traceroute_panel(dashboard, f, side[1]);
    render_error(dashboard, f, main_layout[2]);
}

fn render_header(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!("Regions: {}", dashboard.markers().len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            if dashboard.is_fetching() {
                "Fetching..."
            } else {
                "Idle"
            },
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
    ];
    for band in LatencyBand::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(band_color(band))));
        spans.push(Span::styled(
            format!("{} ", band.label()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ));
    }
    spans.push(Span::styled(
        "  ←/→ select  Enter traceroute  s sort",
        Style::default().fg(Color::Gray),
    ));

    let block = Block::default()
        .title("Overview")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Text::from(TextLine::from(spans)))
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn render_map_panel(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Latency Map")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let selected = dashboard
        .selected_marker()
        .map(|marker| marker.code.as_str());

    f.render_widget(
        Canvas::default()
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
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
            }),
        split[0],
    );

    let tooltip = dashboard.selected_marker().map_or_else(
        || Text::from("Waiting for regions..."),
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
    f.render_widget(Paragraph::new(tooltip), split[1]);
}

fn render_latency_table(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let table = dashboard.table();
    let block = Block::default()
        .title(table.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    if table.rows().is_empty() {
        let paragraph = Paragraph::new("No latency data yet")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(COLUMNS.map(Cell::from)).style(
        Style::default()
            .fg(Color::Rgb(0, 0, 238))
            .bg(Color::Rgb(200, 200, 200))
            .add_modifier(Modifier::BOLD),
    );

    let rows = table.rows().iter().map(|row| {
        Row::new(row.cells().map(Cell::from)).style(Style::default().fg(band_color(row.band())))
    });

    let widget = Table::new(rows, [Constraint::Min(16), Constraint::Length(12)])
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(widget, area);
}

fn render_traceroute_panel(
    dashboard: &Dashboard,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let panel = dashboard.traceroute();
    let block = Block::default()
        .title(panel.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    match panel {
        TraceroutePanel::Closed => {
            let paragraph = Paragraph::new("Select a region and press Enter")
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            f.render_widget(paragraph, area);
        }
        TraceroutePanel::Pending { .. } => f.render_widget(block, area),
        TraceroutePanel::NoData { .. } => {
            f.render_widget(Paragraph::new(NO_DATA_MESSAGE).block(block), area);
        }
        TraceroutePanel::Hops { .. } => {
            let header = Row::new(HOP_COLUMNS.map(Cell::from)).style(
                Style::default()
                    .fg(Color::Rgb(0, 0, 238))
                    .bg(Color::Rgb(200, 200, 200))
                    .add_modifier(Modifier::BOLD),
            );

            let rows = panel
                .rows()
                .into_iter()
                .map(|row| Row::new(row.map(Cell::from)).style(Style::default().fg(Color::White)));

            let table = Table::new(
                rows,
                [
                    Constraint::Length(4),
                    Constraint::Min(15),
                    Constraint::Length(10),
                ],
            )
            .header(header)
            .block(block)
            .column_spacing(1);

            f.render_widget(table, area);
        }
    }
}

fn render_error(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let paragraph = Paragraph::new(dashboard.error().unwrap_or_default().to_string())
        .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

const fn band_color(band: LatencyBand) -> Color {
    let (r, g, b) = band.rgb();
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use latency_core::{FetchError, Region, Snapshot, TracerouteHop};
    use ratzilla::ratatui::{backend::TestBackend, Terminal};

    fn screen(dashboard: &Dashboard) -> String {
        let backend = TestBackend::new(140, 40);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal
            .draw(|f| draw(dashboard, f))
            .expect("failed to draw");

        let buffer = terminal.backend().buffer();
        let width = usize::from(buffer.area.width);
        let symbols: Vec<&str> = buffer.content.iter().map(|cell| cell.symbol()).collect();
        symbols
            .chunks(width)
            .map(|line| line.concat())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.begin_cycle();
        dashboard.apply_cycle(Ok(Snapshot {
            regions: vec![
                Region {
                    code: "us".to_string(),
                    name: "US East".to_string(),
                    lat: 38.9,
                    lon: -77.0,
                },
                Region {
                    code: "ap".to_string(),
                    name: "Tokyo".to_string(),
                    lat: 35.6,
                    lon: 139.7,
                },
            ],
            latencies: [("ap", None), ("us", Some(42.0))].into_iter().collect(),
        }));
        dashboard
    }

    #[test]
    fn empty_dashboard_shows_placeholders() {
        let text = screen(&Dashboard::new());

        assert!(text.contains("Region Latency"));
        assert!(text.contains("Regions: 0"));
        assert!(text.contains("No latency data yet"));
        assert!(text.contains("Select a region and press Enter"));
        assert!(text.contains("Waiting for regions..."));
    }

    #[test]
    fn loaded_dashboard_lists_rows_and_selected_tooltip() {
        let text = screen(&loaded());

        assert!(text.contains("Regions: 2"));
        assert!(text.contains("Latency (sorted by latency)"));
        assert!(text.contains("42 ms"));
        assert!(text.contains("N/A"));
        assert!(text.contains("US East"));
        assert!(text.contains("Latency: 42 ms"));
    }

    #[test]
    fn traceroute_panel_follows_the_lookup() {
        let mut dashboard = loaded();
        dashboard.show_traceroute("us");
        assert!(screen(&dashboard).contains("Traceroute to us"));

        dashboard.apply_traceroute(
            "us",
            Ok(Some(vec![TracerouteHop {
                hop: 1,
                ip: "10.0.0.1".to_string(),
                rtt: Some(1.234),
            }])),
        );
        let text = screen(&dashboard);
        assert!(text.contains("RTT (ms)"));
        assert!(text.contains("10.0.0.1"));
        assert!(text.contains("1.23 ms"));

        dashboard.apply_traceroute("ap", Ok(None));
        assert!(screen(&dashboard).contains(NO_DATA_MESSAGE));
    }

    #[test]
    fn fetch_errors_reach_the_error_line() {
        let mut dashboard = loaded();
        dashboard.begin_cycle();
        dashboard.apply_cycle(Err(FetchError::Status(500)));

        let text = screen(&dashboard);
        assert!(text.contains("Error fetching data: HTTP error! status: 500"));
        assert!(text.contains("42 ms"));
    }

    #[test]
    fn band_colors_follow_the_classifier() {
        assert_eq!(band_color(LatencyBand::Gray), Color::Rgb(128, 128, 128));
        assert_eq!(band_color(LatencyBand::Orange), Color::Rgb(255, 165, 0));
    }
}
