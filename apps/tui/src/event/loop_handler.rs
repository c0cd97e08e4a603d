use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use latency_core::Command;
use latency_dashboard::client::ApiClient;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use super::tasks::{spawn_poller, spawn_traceroute, DashboardEvent};
use crate::app::{handle_key, handle_mouse, App};
use crate::ui;

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    client: ApiClient,
    poll_interval: Duration,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let (events_tx, mut events_rx) = unbounded_channel();
    spawn_poller(client.clone(), poll_interval, events_tx.clone());

    while app.running {
        // Apply every fetch result that landed since the last frame
        while let Ok(event) = events_rx.try_recv() {
            apply_event(app, event);
        }

        app.update();

        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if !matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            continue;
        }

        let command = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => handle_key(app, key.code),
            Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
            // Resizes are picked up by the next draw
            Ok(_) | Err(_) => None,
        };

        if let Some(command) = command {
            dispatch(app, &client, &events_tx, command);
        }
    }

    Ok(())
}

fn dispatch(
    app: &mut App,
    client: &ApiClient,
    events: &UnboundedSender<DashboardEvent>,
    command: Command,
) {
    match command {
        Command::ShowTraceroute(code) => {
            app.dashboard.show_traceroute(&code);
            spawn_traceroute(client.clone(), code, events.clone());
        }
    }
}

fn apply_event(app: &mut App, event: DashboardEvent) {
    match event {
        DashboardEvent::CycleStarted => app.dashboard.begin_cycle(),
        DashboardEvent::Cycle(result) => {
            let before = app.dashboard.completed_cycles();
            app.dashboard.apply_cycle(result);
            app.mark_updated(before);
        }
        DashboardEvent::CycleAborted(message) => {
            app.dashboard.abandon_cycle();
            app.dashboard.report_uncaught(&message);
        }
        DashboardEvent::Traceroute { code, result } => {
            app.dashboard.apply_traceroute(&code, result);
        }
        DashboardEvent::Uncaught(message) => app.dashboard.report_uncaught(&message),
    }
}
