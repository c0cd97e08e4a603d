use crate::app::App;
use latency_core::LatencyBand;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

use crate::ui::band_color;

pub fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Region Latency")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(14)])
        .split(inner);

    let dashboard = &app.dashboard;
    let updated = app.last_updated.map_or_else(
        || "never".to_string(),
        |time| time.format("%H:%M:%S").to_string(),
    );

    let mut spans = vec![
        Span::styled(
            format!("Regions: {}", dashboard.markers().len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(format!("Updated: {updated}"), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled(app.api_label.clone(), Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
    ];
    for band in LatencyBand::ALL {
        spans.push(Span::styled("■ ", Style::default().fg(band_color(band))));
        spans.push(Span::styled(
            format!("{} ", band.label()),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ));
    }

    f.render_widget(Paragraph::new(TextLine::from(spans)), columns[0]);

    if dashboard.is_fetching() {
        let throbber = Throbber::default()
            .label("Fetching")
            .style(Style::default().fg(Color::Gray))
            .throbber_style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, columns[1], &mut state);
    }
}

pub fn render_error(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = match app.dashboard.error() {
        Some(message) => Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        None => Paragraph::new(""),
    };

    f.render_widget(paragraph.block(block).wrap(Wrap { trim: true }), area);
}

pub fn render_help(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let help_text = vec![
        Span::styled("←/→", key),
        Span::raw(": Select region   "),
        Span::styled("Enter", key),
        Span::raw("/"),
        Span::styled("click", key),
        Span::raw(": Traceroute   "),
        Span::styled("s", key),
        Span::raw(": Sort   "),
        Span::styled("q", key),
        Span::raw(": Quit"),
    ];

    let paragraph = Paragraph::new(TextLine::from(help_text)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
