use crate::app::App;
use crate::ui::band_color;
use latency_core::table::COLUMNS;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_latency_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let table = app.dashboard.table();
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
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let selected = app
        .dashboard
        .selected_marker()
        .map(|marker| marker.code.as_str());

    let rows = table.rows().iter().map(|row| {
        let style = if selected == Some(row.region.as_str()) {
            Style::default()
                .bg(Color::Rgb(0, 0, 238))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(band_color(row.band()))
        };
        Row::new(row.cells().map(Cell::from)).style(style)
    });

    let widget = Table::new(rows, [Constraint::Min(16), Constraint::Length(12)])
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(widget, area);
}
