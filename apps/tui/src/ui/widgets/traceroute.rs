use crate::app::App;
use latency_core::traceroute::{HOP_COLUMNS, NO_DATA_MESSAGE};
use latency_core::TraceroutePanel;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_traceroute(app: &App, f: &mut Frame<'_>, area: Rect) {
    let panel = app.dashboard.traceroute();
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
        TraceroutePanel::Pending { .. } => {
            f.render_widget(block, area);
        }
        TraceroutePanel::NoData { .. } => {
            let paragraph = Paragraph::new(NO_DATA_MESSAGE).block(block);
            f.render_widget(paragraph, area);
        }
        TraceroutePanel::Hops { .. } => {
            let header = Row::new(HOP_COLUMNS.map(Cell::from)).style(
                Style::default()
                    .fg(Color::Yellow)
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
